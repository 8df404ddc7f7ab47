//! Row gathers, column concatenation and grouped reductions over the rows of
//! a batch.
//!
//! A segment id array assigns each data row to one of `num_segments` groups
//! (for message passing: the receiver atom of each edge). Segments with no rows
//! reduce to zero.

use super::error::NnError;
use nalgebra::DMatrix;

fn check_ids(ids: &[usize], rows: usize, num_segments: usize) -> Result<(), NnError> {
    if ids.len() != rows {
        return Err(NnError::SegmentLength {
            ids: ids.len(),
            rows,
        });
    }
    if let Some(&id) = ids.iter().find(|&&id| id >= num_segments) {
        return Err(NnError::SegmentOutOfRange { id, num_segments });
    }
    Ok(())
}

/// Copies the rows named by `indices` into a new matrix, in order.
pub fn gather_rows(data: &DMatrix<f64>, indices: &[usize]) -> Result<DMatrix<f64>, NnError> {
    if let Some(&index) = indices.iter().find(|&&i| i >= data.nrows()) {
        return Err(NnError::RowOutOfRange {
            index,
            rows: data.nrows(),
        });
    }
    Ok(data.select_rows(indices))
}

/// Places the blocks side by side. All blocks must have the same row count.
pub fn concat_columns(blocks: &[&DMatrix<f64>]) -> Result<DMatrix<f64>, NnError> {
    let rows = blocks.first().map_or(0, |b| b.nrows());
    if let Some(block) = blocks.iter().find(|b| b.nrows() != rows) {
        return Err(NnError::RowCount {
            expected: rows,
            found: block.nrows(),
        });
    }
    let cols = blocks.iter().map(|b| b.ncols()).sum();
    let mut out = DMatrix::<f64>::zeros(rows, cols);
    let mut offset = 0;
    for block in blocks {
        out.columns_mut(offset, block.ncols()).copy_from(*block);
        offset += block.ncols();
    }
    Ok(out)
}

pub fn segment_sum(
    data: &DMatrix<f64>,
    segment_ids: &[usize],
    num_segments: usize,
) -> Result<DMatrix<f64>, NnError> {
    check_ids(segment_ids, data.nrows(), num_segments)?;
    let mut out = DMatrix::<f64>::zeros(num_segments, data.ncols());
    for (row, &id) in segment_ids.iter().enumerate() {
        let mut target = out.row_mut(id);
        target += data.row(row);
    }
    Ok(out)
}

/// Per-segment mean; empty segments yield a zero row.
pub fn segment_mean(
    data: &DMatrix<f64>,
    segment_ids: &[usize],
    num_segments: usize,
) -> Result<DMatrix<f64>, NnError> {
    let mut out = segment_sum(data, segment_ids, num_segments)?;
    let mut counts = vec![0usize; num_segments];
    for &id in segment_ids {
        counts[id] += 1;
    }
    for (id, &count) in counts.iter().enumerate() {
        if count > 1 {
            let mut row = out.row_mut(id);
            row /= count as f64;
        }
    }
    Ok(out)
}

/// Softmax of each column taken over the rows that share a segment id.
///
/// The per-segment maximum is subtracted before exponentiation.
pub fn segment_softmax(
    logits: &DMatrix<f64>,
    segment_ids: &[usize],
    num_segments: usize,
) -> Result<DMatrix<f64>, NnError> {
    check_ids(segment_ids, logits.nrows(), num_segments)?;
    let cols = logits.ncols();

    let mut maxima = DMatrix::from_element(num_segments, cols, f64::NEG_INFINITY);
    for (row, &id) in segment_ids.iter().enumerate() {
        for c in 0..cols {
            maxima[(id, c)] = maxima[(id, c)].max(logits[(row, c)]);
        }
    }

    let mut weights = DMatrix::<f64>::zeros(logits.nrows(), cols);
    let mut totals = DMatrix::<f64>::zeros(num_segments, cols);
    for (row, &id) in segment_ids.iter().enumerate() {
        for c in 0..cols {
            let w = (logits[(row, c)] - maxima[(id, c)]).exp();
            weights[(row, c)] = w;
            totals[(id, c)] += w;
        }
    }
    for (row, &id) in segment_ids.iter().enumerate() {
        for c in 0..cols {
            weights[(row, c)] /= totals[(id, c)];
        }
    }
    Ok(weights)
}
