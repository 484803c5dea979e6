//! Concurrent voicing of fragments.

use super::{Fragment, ProcessedFragment};
use crate::media::MediaKind;
use crate::speech::SpeechSynthesizer;
use crate::workspace::relative_media_path;
use futures::stream::{self, StreamExt};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use tracing::{info, instrument, warn};

/// Voice every fragment with at most `max_workers` requests in flight.
///
/// Fragments with an empty script are skipped. A failed fragment is logged
/// and dropped; the rest still complete. Results arrive in completion order.
#[instrument(skip_all, fields(fragments = fragments.len(), provider = synth.name()))]
pub async fn process_fragments(
    fragments: &[Fragment],
    synth: &dyn SpeechSynthesizer,
    media_dir: &Path,
    html_dir: &Path,
    max_workers: usize,
) -> Vec<ProcessedFragment> {
    let pending: Vec<Fragment> = fragments
        .iter()
        .filter(|f| !f.script.is_empty())
        .cloned()
        .collect();
    if pending.is_empty() {
        return Vec::new();
    }

    info!("Voicing {} fragments with up to {} workers", pending.len(), max_workers);

    let pb = ProgressBar::new(pending.len() as u64);
    if let Ok(style) = ProgressStyle::default_bar()
        .template("  {spinner:.green} Voicing   [{bar:30.cyan/blue}] {pos}/{len}")
    {
        pb.set_style(style.progress_chars("█▓░"));
    }

    let total = pending.len();
    let mut results = Vec::with_capacity(total);

    let mut stream = stream::iter(pending.into_iter())
        .map(|fragment: Fragment| async move {
            let dir = media_dir.join(fragment.kind.subdir());
            let outcome = match fragment.kind {
                MediaKind::Tts => synth.synthesize_speech(&fragment.script, &dir).await,
                MediaKind::Ttv => synth.synthesize_avatar(&fragment.script, &dir).await,
            };
            (fragment, outcome)
        })
        .buffer_unordered(max_workers.max(1));

    while let Some((fragment, outcome)) = stream.next().await {
        pb.inc(1);
        match outcome {
            Ok(path) => {
                let relative_path = relative_media_path(&path, html_dir);
                results.push(ProcessedFragment {
                    absolute_path: path,
                    relative_path,
                    id: fragment.id,
                    kind: fragment.kind,
                });
            }
            Err(e) => warn!("Error processing fragment {}: {}", fragment.id, e),
        }
    }

    pb.finish_and_clear();
    info!("Voiced {}/{} fragments", results.len(), total);

    results
}
