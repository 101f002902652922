use crate::config::AnalysisConfig;
use crate::decoder::RecordDecoder;
use crate::error::KtResult;
use crate::evaluator::Evaluator;
use crate::record::EventKind;
use crate::session::SessionSplitter;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use tracing::{debug, info, warn};

/// Counters gathered while reading a log, alongside the evaluator itself.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ReadStats {
    pub records: u64,
    pub key_downs: u64,
    pub key_ups: u64,
    pub bytes: u64,
}

/// Service: decode a log, split it into sessions and evaluate each one.
///
/// `on_session` sees every session's text right before it is evaluated.
pub fn analyze_reader<R, F>(
    reader: R,
    config: &AnalysisConfig,
    mut on_session: F,
) -> KtResult<(Evaluator, ReadStats)>
where
    R: Read,
    F: FnMut(&str),
{
    let mut decoder = RecordDecoder::new(reader);
    let mut splitter = SessionSplitter::new(config.session_gap_ms);
    let mut evaluator = Evaluator::new();
    let mut stats = ReadStats::default();

    let mut flush = |evaluator: &mut Evaluator, session: String| {
        debug!("Session of {} chars", session.chars().count());
        on_session(&session);
        evaluator.evaluate(&session);
    };

    for record in decoder.by_ref() {
        let record = record?;
        stats.records += 1;
        match record.event_kind {
            EventKind::KeyDown => stats.key_downs += 1,
            EventKind::KeyUp => stats.key_ups += 1,
            // The decoder rejects unknown codes; only hand-built records
            // reach this arm.
            EventKind::Invalid => warn!("Skipping record with invalid event kind"),
        }

        if let Some(session) = splitter.push(&record) {
            flush(&mut evaluator, session);
        }
    }

    if let Some(session) = splitter.finish() {
        flush(&mut evaluator, session);
    }

    stats.bytes = decoder.offset();
    info!(
        "Read {} records ({} key-down, {} key-up) in {} sessions",
        stats.records,
        stats.key_downs,
        stats.key_ups,
        evaluator.sessions()
    );

    Ok((evaluator, stats))
}

/// Service: analyze the log at `path`.
pub fn analyze_file<P, F>(
    path: P,
    config: &AnalysisConfig,
    on_session: F,
) -> KtResult<(Evaluator, ReadStats)>
where
    P: AsRef<Path>,
    F: FnMut(&str),
{
    let path = path.as_ref();
    info!("Loading key log: {}", path.display());
    let file = File::open(path)?;
    analyze_reader(BufReader::new(file), config, on_session)
}
