//! Encoding progress reporting
//!
//! Encoders report named milestones through a [`ProgressObserver`]. Observers
//! are called inline on the encoding thread, in milestone order, and must not
//! block.

/// Milestone reached by an encoder
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProgressStage {
    /// Encoding started
    Start,
    /// Resolving a file's dimensions (once per file, 10-40%)
    ResolveFile,
    /// Building the metadata table
    BuildTable,
    /// Starting to merge payload data
    MergeData,
    /// Appending a file's payload (once per file, 60-80%)
    MergeFile,
    /// Computing the checksum
    Checksum,
    /// Writing the final blob
    Assemble,
    /// Blob complete
    Done,
}

impl ProgressStage {
    /// Percent complete at this milestone.
    ///
    /// `index`/`total` position per-file milestones inside their band and
    /// are ignored by the fixed milestones.
    pub fn percent(self, index: usize, total: usize) -> f32 {
        let fraction = if total == 0 {
            0.0
        } else {
            index as f32 / total as f32
        };
        match self {
            ProgressStage::Start => 0.0,
            ProgressStage::ResolveFile => 10.0 + fraction * 30.0,
            ProgressStage::BuildTable => 40.0,
            ProgressStage::MergeData => 60.0,
            ProgressStage::MergeFile => 60.0 + fraction * 20.0,
            ProgressStage::Checksum => 80.0,
            ProgressStage::Assemble => 90.0,
            ProgressStage::Done => 100.0,
        }
    }
}

/// Receives encoding milestones
pub trait ProgressObserver {
    fn on_progress(&mut self, stage: ProgressStage, percent: f32, message: &str);
}

impl<F> ProgressObserver for F
where
    F: FnMut(ProgressStage, f32, &str),
{
    fn on_progress(&mut self, stage: ProgressStage, percent: f32, message: &str) {
        self(stage, percent, message)
    }
}

/// Observer that discards every milestone
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl ProgressObserver for NoProgress {
    fn on_progress(&mut self, _stage: ProgressStage, _percent: f32, _message: &str) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_milestones() {
        assert_eq!(ProgressStage::Start.percent(0, 0), 0.0);
        assert_eq!(ProgressStage::BuildTable.percent(3, 4), 40.0);
        assert_eq!(ProgressStage::Checksum.percent(0, 1), 80.0);
        assert_eq!(ProgressStage::Done.percent(0, 1), 100.0);
    }

    #[test]
    fn test_per_file_bands() {
        assert_eq!(ProgressStage::ResolveFile.percent(0, 4), 10.0);
        assert_eq!(ProgressStage::ResolveFile.percent(2, 4), 25.0);
        assert_eq!(ProgressStage::MergeFile.percent(0, 4), 60.0);
        assert_eq!(ProgressStage::MergeFile.percent(3, 4), 75.0);
    }

    #[test]
    fn test_closure_observer() {
        let mut seen = Vec::new();
        {
            let mut observer = |stage: ProgressStage, percent: f32, _: &str| {
                seen.push((stage, percent));
            };
            observer.on_progress(ProgressStage::Start, 0.0, "start");
            observer.on_progress(ProgressStage::Done, 100.0, "done");
        }
        assert_eq!(
            seen,
            vec![(ProgressStage::Start, 0.0), (ProgressStage::Done, 100.0)]
        );
    }
}
