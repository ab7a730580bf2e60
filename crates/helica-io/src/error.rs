use std::path::PathBuf;

use helica_linalg::RigidError;

/// An error type for the io module.
#[derive(Debug, thiserror::Error)]
pub enum IoError {
    /// Error reading or writing file
    #[error("error reading or writing file")]
    Io(#[from] std::io::Error),

    /// A value could not be parsed.
    #[error("{}:{line}: {msg}", path.display())]
    Parse {
        /// The offending file.
        path: PathBuf,
        /// 1-based line number.
        line: usize,
        /// What went wrong.
        msg: String,
    },

    /// A row has the wrong number of columns.
    #[error("{}:{line}: expected {expected} columns, found {found}", path.display())]
    ColumnCount {
        /// The offending file.
        path: PathBuf,
        /// 1-based line number.
        line: usize,
        /// Expected number of columns.
        expected: usize,
        /// Number of columns found.
        found: usize,
    },

    /// Marker rows must hold whole `x y z` triples.
    #[error("{}: {columns} columns are not divisible by 3", path.display())]
    MarkerColumns {
        /// The marker file.
        path: PathBuf,
        /// Number of columns found.
        columns: usize,
    },

    /// Position and rotation files of one object disagree in length.
    #[error("object '{object}': {positions} positions but {rotations} rotations")]
    PoseRowMismatch {
        /// Object name.
        object: String,
        /// Rows in the position file.
        positions: usize,
        /// Rows in the rotation file.
        rotations: usize,
    },

    /// An object has neither a complete pose pair nor a marker file.
    #[error("object '{object}': missing {}", path.display())]
    MissingPoseFile {
        /// Object name.
        object: String,
        /// The missing file.
        path: PathBuf,
    },

    /// Objects of one scene have different numbers of timesteps.
    #[error("object '{object}' has {found} timesteps, expected {expected}")]
    SequenceLengthMismatch {
        /// Object name.
        object: String,
        /// Timesteps of the first object.
        expected: usize,
        /// Timesteps of this object.
        found: usize,
    },

    /// The folder holds no motion data.
    #[error("no motion data found in {}", .0.display())]
    EmptyScene(PathBuf),

    /// Marker registration failed.
    #[error("object '{object}': {source}")]
    Registration {
        /// Object name.
        object: String,
        /// Underlying error.
        #[source]
        source: RigidError,
    },
}
