use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum NnError {
    #[error("Input has {found} columns, but the layer expects {expected}")]
    InputWidth { expected: usize, found: usize },
    #[error("Weight matrix is {rows}x{cols}, but the bias has {bias} entries")]
    BiasLength { rows: usize, cols: usize, bias: usize },
    #[error("Segment id {id} is out of range for {num_segments} segments")]
    SegmentOutOfRange { id: usize, num_segments: usize },
    #[error("{ids} segment ids supplied for {rows} data rows")]
    SegmentLength { ids: usize, rows: usize },
    #[error("Block has {found} rows, expected {expected}")]
    RowCount { expected: usize, found: usize },
    #[error("Row index {index} is out of range for {rows} rows")]
    RowOutOfRange { index: usize, rows: usize },
    #[error("Attention layer has no heads")]
    NoHeads,
}
