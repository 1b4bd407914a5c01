use crate::config::Tier;
use crate::data::{load_boundaries, BoundarySource};
use crate::error::LoadError;
use crate::map::BoundaryGroup;
use std::sync::mpsc::{self, Receiver, TryRecvError};

type LoadResult = Result<BoundaryGroup, LoadError>;

/// A boundary load running on the rayon pool.
///
/// The frame loop calls [`LoadTask::poll`] once per frame; the task never
/// touches the scene itself. There is no cancellation.
pub struct LoadTask {
    tier: Tier,
    receiver: Receiver<LoadResult>,
}

impl LoadTask {
    /// Start reading and building `source` in the background.
    pub fn spawn(source: BoundarySource, radius: f64) -> Self {
        let tier = source.style.tier;
        let (sender, receiver) = mpsc::sync_channel(1);
        tracing::debug!(tier = %tier, path = %source.path.display(), "Spawning boundary load");
        rayon::spawn(move || {
            let result = load_boundaries(&source, radius);
            // Receiver gone means the app shut down first
            let _ = sender.send(result);
        });
        Self { tier, receiver }
    }

    /// A task that has already finished with `result`
    pub fn ready(tier: Tier, result: LoadResult) -> Self {
        let (sender, receiver) = mpsc::sync_channel(1);
        let _ = sender.send(result);
        Self { tier, receiver }
    }

    /// `None` while the load is running, then the result exactly once.
    pub fn poll(&self) -> Option<LoadResult> {
        match self.receiver.try_recv() {
            Ok(result) => Some(result),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => Some(Err(LoadError::TaskDropped {
                tier: self.tier.to_string(),
            })),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Rgb;
    use crate::data::TierStyle;
    use std::io::Write;
    use std::time::{Duration, Instant};

    fn wait(task: &LoadTask) -> LoadResult {
        let deadline = Instant::now() + Duration::from_secs(10);
        loop {
            if let Some(result) = task.poll() {
                return result;
            }
            assert!(Instant::now() < deadline, "load task did not finish");
            std::thread::sleep(Duration::from_millis(5));
        }
    }

    #[test]
    fn test_spawned_load_completes() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"type":"FeatureCollection","features":[{{"type":"Feature","properties":{{}},
               "geometry":{{"type":"Polygon","coordinates":[[[0,0],[10,0],[10,10],[0,0]]]}}}}]}}"#
        )
        .unwrap();

        let style = TierStyle::new(Tier::Country, Rgb::WHITE);
        let task = LoadTask::spawn(BoundarySource::new(file.path(), style), 1.001);
        let group = wait(&task).unwrap();
        assert_eq!(group.lines.len(), 1);
        assert_eq!(group.lines[0].vertices.len(), 4);
    }

    #[test]
    fn test_spawned_load_reports_missing_file() {
        let style = TierStyle::new(Tier::Province, Rgb::ORANGE);
        let task = LoadTask::spawn(BoundarySource::new("/definitely/not/here.geojson", style), 1.001);
        assert!(matches!(wait(&task), Err(LoadError::Read { .. })));
    }

    #[test]
    fn test_ready_task_yields_once() {
        let task = LoadTask::ready(
            Tier::City,
            Ok(BoundaryGroup::new(Tier::City, Rgb::RED, Vec::new())),
        );
        assert!(matches!(task.poll(), Some(Ok(_))));
        // Sender is gone after the single send
        assert!(matches!(task.poll(), Some(Err(LoadError::TaskDropped { .. }))));
    }
}
