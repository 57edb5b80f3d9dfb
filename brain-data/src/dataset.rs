use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::BrainDataError;

/// Where the files of a dataset live, relative to its root
#[derive(Debug, Clone)]
pub struct DatasetLayout {
    /// Directory of the functional runs
    pub func_dir: String,
    /// Only runs whose file name starts with this are used
    pub func_prefix: String,
    /// Directory of the stimulus label files
    pub label_dir: String,
    /// Only label files whose name starts with this are used
    pub label_prefix: String,
    /// The brain mask image
    pub mask: String,
}

impl Default for DatasetLayout {
    /// The random pattern runs of the Miyawaki 2008 dataset
    fn default() -> Self {
        Self {
            func_dir: "func".to_string(),
            func_prefix: "data_random".to_string(),
            label_dir: "label".to_string(),
            label_prefix: "label_random".to_string(),
            mask: "mask.nii.gz".to_string(),
        }
    }
}

/// A functional run and the stimuli shown during it
#[derive(Debug, Clone, PartialEq)]
pub struct Run {
    /// 4D functional image
    pub func: PathBuf,
    /// Stimulus label file, one stimulus per scan
    pub label: PathBuf,
}

/// The files making up an encoding dataset
#[derive(Debug, Clone)]
pub struct Dataset {
    /// Root directory
    pub root: PathBuf,
    /// Runs, sorted by file name
    pub runs: Vec<Run>,
    /// The brain mask image
    pub mask: PathBuf,
}

impl Dataset {
    /// Finds all runs below `root`, pairing images and labels by sorted file name
    pub fn discover(root: &Path, layout: &DatasetLayout) -> Result<Self, BrainDataError> {
        let dataset_err = |reason: String| BrainDataError::Dataset {
            root: root.to_path_buf(),
            reason,
        };

        let funcs = list_files(
            &root.join(&layout.func_dir),
            &layout.func_prefix,
            &[".nii", ".nii.gz"],
        )?;
        let labels = list_files(
            &root.join(&layout.label_dir),
            &layout.label_prefix,
            &[".csv"],
        )?;

        if funcs.is_empty() {
            return Err(dataset_err(format!(
                "no functional runs named {}* in {}",
                layout.func_prefix, layout.func_dir
            )));
        }
        if funcs.len() != labels.len() {
            return Err(dataset_err(format!(
                "{} functional runs but {} label files",
                funcs.len(),
                labels.len()
            )));
        }

        let mask = root.join(&layout.mask);
        if !mask.is_file() {
            return Err(dataset_err(format!("mask {:?} is missing", mask)));
        }

        let runs: Vec<Run> = funcs
            .into_iter()
            .zip(labels)
            .map(|(func, label)| Run { func, label })
            .collect();
        info!("found {} runs in {:?}", runs.len(), root);

        Ok(Self {
            root: root.to_path_buf(),
            runs,
            mask,
        })
    }
}

/// Sorted files of `dir` starting with `prefix` and ending in one of `extensions`
fn list_files(
    dir: &Path,
    prefix: &str,
    extensions: &[&str],
) -> Result<Vec<PathBuf>, BrainDataError> {
    let io_err = |source| BrainDataError::Io {
        path: dir.to_path_buf(),
        source,
    };

    let mut files = vec![];
    for entry in fs::read_dir(dir).map_err(io_err)? {
        let path = entry.map_err(io_err)?.path();
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if name.starts_with(prefix) && extensions.iter().any(|e| name.ends_with(e)) {
            files.push(path);
        }
    }
    files.sort();

    Ok(files)
}

#[cfg(test)]
mod tests {
    use std::fs::{create_dir_all, write};

    use tempfile::tempdir;

    use super::*;

    fn touch(path: PathBuf) {
        write(path, b"").unwrap();
    }

    #[test]
    fn random_runs_are_paired_in_order() {
        if let Err(_) = pretty_env_logger::try_init() {}

        let dir = tempdir().unwrap();
        let root = dir.path();
        create_dir_all(root.join("func")).unwrap();
        create_dir_all(root.join("label")).unwrap();
        for run in ["02", "01"] {
            touch(root.join(format!("func/data_random_run{}.nii.gz", run)));
            touch(root.join(format!("label/label_random_run{}.csv", run)));
        }
        // figure runs are not part of the analysis
        touch(root.join("func/data_figure_run01.nii.gz"));
        touch(root.join("label/label_figure_run01.csv"));
        touch(root.join("mask.nii.gz"));

        let dataset = Dataset::discover(root, &DatasetLayout::default()).unwrap();
        assert_eq!(dataset.root, root);
        assert_eq!(dataset.runs.len(), 2);
        assert_eq!(dataset.runs[0], Run {
            func: root.join("func/data_random_run01.nii.gz"),
            label: root.join("label/label_random_run01.csv"),
        });
        assert!(dataset.runs[1].func.ends_with("data_random_run02.nii.gz"));
        assert_eq!(dataset.mask, root.join("mask.nii.gz"));
    }

    #[test]
    fn unpaired_runs_are_rejected() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        create_dir_all(root.join("func")).unwrap();
        create_dir_all(root.join("label")).unwrap();
        touch(root.join("func/data_random_run01.nii.gz"));
        touch(root.join("func/data_random_run02.nii.gz"));
        touch(root.join("label/label_random_run01.csv"));
        touch(root.join("mask.nii.gz"));

        assert!(matches!(
            Dataset::discover(root, &DatasetLayout::default()),
            Err(BrainDataError::Dataset { .. })
        ));
    }

    #[test]
    fn missing_directory_is_an_io_error() {
        let dir = tempdir().unwrap();

        assert!(matches!(
            Dataset::discover(dir.path(), &DatasetLayout::default()),
            Err(BrainDataError::Io { .. })
        ));
    }
}
