use base64::{engine::general_purpose::STANDARD_NO_PAD, Engine as _};
use maze_walk_core::MazeGrid;
use serde::{Deserialize, Serialize};
use thiserror::Error;

const SNAPSHOT_DOMAIN: &str = "maze";
const SNAPSHOT_VERSION: &str = "v1";

/// Identifier prefix emitted before the encoded snapshot payload.
pub(crate) const SNAPSHOT_HEADER: &str = "maze:v1";

/// Snapshot of a generated maze layout suitable for clipboard transfer.
///
/// Encoded as `maze:v1:<columns>x<rows>:<base64>` where the payload is
/// the JSON-serialised passage grid. The human-readable dimensions let
/// a recipient size-check a string without decoding it; `decode`
/// cross-checks them against the payload.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct MazeLayoutSnapshot {
    /// Number of cell columns contained in the maze.
    pub columns: u32,
    /// Number of cell rows contained in the maze.
    pub rows: u32,
    /// Passage grid composing the layout.
    pub grid: MazeGrid,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
struct SnapshotPayload {
    grid: MazeGrid,
}

/// Reasons a layout transfer string can fail to decode.
#[derive(Debug, Error)]
pub(crate) enum LayoutTransferError {
    /// The string was empty or contained only whitespace.
    #[error("layout string is empty")]
    Empty,
    /// The string ended before the named segment.
    #[error("layout string is truncated before the {0} segment")]
    Truncated(&'static str),
    /// The string carried a foreign prefix.
    #[error("'{0}' is not a maze layout prefix")]
    ForeignPrefix(String),
    /// The string used a version this build cannot read.
    #[error("layout version '{0}' is not supported")]
    UnsupportedVersion(String),
    /// The dimensions segment was not a positive `<columns>x<rows>` pair.
    #[error("'{0}' is not a <columns>x<rows> pair")]
    InvalidDimensions(String),
    /// The payload segment was not valid base64.
    #[error("layout payload is not valid base64")]
    InvalidEncoding(#[from] base64::DecodeError),
    /// The payload decoded but did not describe a passage grid.
    #[error("layout payload does not describe a maze grid")]
    InvalidPayload(#[from] serde_json::Error),
    /// The header dimensions disagreed with the decoded grid.
    #[error("header announces a {header_columns}x{header_rows} maze but the payload holds {payload_columns}x{payload_rows}")]
    DimensionMismatch {
        /// Columns announced in the string header.
        header_columns: u32,
        /// Rows announced in the string header.
        header_rows: u32,
        /// Columns carried by the decoded grid.
        payload_columns: u32,
        /// Rows carried by the decoded grid.
        payload_rows: u32,
    },
}

impl MazeLayoutSnapshot {
    /// Captures the given grid into a snapshot.
    #[must_use]
    pub(crate) fn from_grid(grid: MazeGrid) -> Self {
        Self {
            columns: grid.size().columns(),
            rows: grid.size().rows(),
            grid,
        }
    }

    /// Encodes the snapshot into a single clipboard-friendly line.
    #[must_use]
    pub(crate) fn encode(&self) -> String {
        let payload = SnapshotPayload {
            grid: self.grid.clone(),
        };
        let json = serde_json::to_vec(&payload).expect("grid serialization never fails");
        format!(
            "{SNAPSHOT_HEADER}:{}x{}:{}",
            self.columns,
            self.rows,
            STANDARD_NO_PAD.encode(json)
        )
    }

    /// Decodes a snapshot from its string representation.
    pub(crate) fn decode(value: &str) -> Result<Self, LayoutTransferError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(LayoutTransferError::Empty);
        }

        let mut segments = trimmed.splitn(4, ':');
        let mut segment = |name| segments.next().ok_or(LayoutTransferError::Truncated(name));
        let domain = segment("prefix")?;
        let version = segment("version")?;
        let dimensions = segment("dimensions")?;
        let payload = segment("payload")?;

        if domain != SNAPSHOT_DOMAIN {
            return Err(LayoutTransferError::ForeignPrefix(domain.to_owned()));
        }
        if version != SNAPSHOT_VERSION {
            return Err(LayoutTransferError::UnsupportedVersion(version.to_owned()));
        }

        let (columns, rows) = parse_dimensions(dimensions)?;
        let json = STANDARD_NO_PAD.decode(payload.as_bytes())?;
        let decoded: SnapshotPayload = serde_json::from_slice(&json)?;

        let size = decoded.grid.size();
        if size.columns() != columns || size.rows() != rows {
            return Err(LayoutTransferError::DimensionMismatch {
                header_columns: columns,
                header_rows: rows,
                payload_columns: size.columns(),
                payload_rows: size.rows(),
            });
        }

        Ok(Self {
            columns,
            rows,
            grid: decoded.grid,
        })
    }
}

fn parse_dimensions(dimensions: &str) -> Result<(u32, u32), LayoutTransferError> {
    let malformed = || LayoutTransferError::InvalidDimensions(dimensions.to_owned());
    let (columns, rows) = dimensions.split_once(['x', 'X']).ok_or_else(malformed)?;

    let columns: u32 = columns.trim().parse().map_err(|_| malformed())?;
    let rows: u32 = rows.trim().parse().map_err(|_| malformed())?;
    if columns == 0 || rows == 0 {
        return Err(malformed());
    }
    Ok((columns, rows))
}
