use crate::layout::{self, Finger, KeyCoord, Modifier};
use crate::report::{FrequencyTable, Report};
use strum::EnumCount;

/// Modifier keys currently held, as announced by inline marker glyphs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HeldModifiers {
    pub ctrl: bool,
    pub opt: bool,
    pub cmd: bool,
    pub shift: bool,
}

impl HeldModifiers {
    pub fn hold(&mut self, modifier: Modifier) {
        match modifier {
            Modifier::Ctrl => self.ctrl = true,
            Modifier::Opt => self.opt = true,
            Modifier::Cmd => self.cmd = true,
            Modifier::Shift => self.shift = true,
        }
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// Set of fingers taking part in one keystroke.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FingerSet(u16);

impl FingerSet {
    /// Returns `false` if the finger was already present.
    pub fn insert(&mut self, finger: Finger) -> bool {
        let bit = 1u16 << finger.index();
        let fresh = self.0 & bit == 0;
        self.0 |= bit;
        fresh
    }

    pub fn contains(&self, finger: Finger) -> bool {
        self.0 & (1u16 << finger.index()) != 0
    }

    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = Finger> + '_ {
        use strum::IntoEnumIterator;
        Finger::iter().filter(move |f| self.contains(*f))
    }
}

/// Works out which fingers a keystroke uses once held modifiers are taken
/// into account.
///
/// Ctrl goes to the left pinky, or the left ring finger when the pinky is
/// already busy. Shift goes to the opposite-hand pinky when the key itself is
/// on the left hand (falling back to the right ring finger), else to the left
/// pinky. Cmd and Opt each take the thumb of the opposite hand.
pub fn engaged_fingers(own: Finger, held: HeldModifiers) -> FingerSet {
    let mut set = FingerSet::default();
    set.insert(own);

    if held.ctrl {
        if set.contains(Finger::LeftPinky) {
            set.insert(Finger::LeftRing);
        } else {
            set.insert(Finger::LeftPinky);
        }
    }

    if held.shift {
        if set.contains(Finger::LeftPinky) || own.is_left_hand() {
            if set.contains(Finger::RightPinky) {
                set.insert(Finger::RightRing);
            } else {
                set.insert(Finger::RightPinky);
            }
        } else {
            set.insert(Finger::LeftPinky);
        }
    }

    let thumb = if own.is_left_hand() {
        Finger::RightThumb
    } else {
        Finger::LeftThumb
    };
    if held.cmd {
        set.insert(thumb);
    }
    if held.opt {
        set.insert(thumb);
    }

    set
}

/// State that never crosses a session boundary.
#[derive(Debug, Default)]
struct SessionState {
    previous: Option<KeyCoord>,
    /// Keystrokes that reached finger accounting in this session.
    processed: usize,
    held: HeldModifiers,
}

/// Accumulates ergonomics counters over any number of typing sessions.
#[derive(Debug)]
pub struct Evaluator {
    finger_counts: [u64; Finger::COUNT],
    total: u64,
    sfb_count: u64,
    dsfb_count: u64,
    sessions: u64,
    char_frequency: FrequencyTable,
    unmapped_frequency: FrequencyTable,
    session: SessionState,
}

impl Default for Evaluator {
    fn default() -> Self {
        Self::new()
    }
}

impl Evaluator {
    pub fn new() -> Self {
        Self {
            finger_counts: [0; Finger::COUNT],
            total: 0,
            sfb_count: 0,
            dsfb_count: 0,
            sessions: 0,
            char_frequency: FrequencyTable::default(),
            unmapped_frequency: FrequencyTable::default(),
            session: SessionState::default(),
        }
    }

    /// Feeds one typing session. Bigram and duplicate tracking start fresh
    /// and never look at earlier sessions.
    pub fn evaluate(&mut self, session: &str) {
        self.session = SessionState::default();
        self.sessions += 1;
        for c in session.chars() {
            self.process_char(c);
        }
    }

    fn process_char(&mut self, c: char) {
        if let Some(modifier) = Modifier::from_marker(c) {
            self.session.held.hold(modifier);
            return;
        }

        self.total += 1;

        let Some(current) = layout::lookup(c) else {
            self.unmapped_frequency.record(c);
            self.session.held.clear();
            return;
        };

        if current.implies_shift {
            self.session.held.shift = true;
        }

        // Same physical key again: one effective keystroke. Held modifiers
        // stay as they are.
        if matches!(self.session.previous, Some(prev) if prev.same_key(&current)) {
            return;
        }

        self.char_frequency.record(c);
        for finger in engaged_fingers(current.finger, self.session.held).iter() {
            self.finger_counts[finger.index()] += 1;
        }

        if let Some(prev) = self.session.previous {
            if prev.finger == current.finger {
                self.sfb_count += 1;

                // Measured against the immediate predecessor, like the SFB.
                let far = current.row_distance(&prev) > 1 || current.col_distance(&prev) > 1;
                if self.session.processed >= 2 && far {
                    self.dsfb_count += 1;
                }
            }
        }

        self.session.previous = Some(current);
        self.session.processed += 1;
        self.session.held.clear();
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn sfb_count(&self) -> u64 {
        self.sfb_count
    }

    pub fn dsfb_count(&self) -> u64 {
        self.dsfb_count
    }

    /// Number of `evaluate` calls so far.
    pub fn sessions(&self) -> u64 {
        self.sessions
    }

    pub fn finger_count(&self, finger: Finger) -> u64 {
        self.finger_counts[finger.index()]
    }

    pub fn finger_counts(&self) -> &[u64; Finger::COUNT] {
        &self.finger_counts
    }

    pub fn char_frequency(&self) -> &FrequencyTable {
        &self.char_frequency
    }

    pub fn unmapped_frequency(&self) -> &FrequencyTable {
        &self.unmapped_frequency
    }

    /// Snapshot of the counters. Does not reset anything.
    pub fn report(&self) -> Report {
        Report::from_evaluator(self)
    }
}
