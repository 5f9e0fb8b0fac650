use super::ComputeBackend;
use crate::error::{BenchError, Result};
use ndarray::Array2;
use std::sync::Arc;

#[derive(Debug, Default)]
pub struct NdarrayContext;

/// Backend delegating every operation to `ndarray`.
pub struct NdarrayBackend;

impl ComputeBackend for NdarrayBackend {
    const NAME: &'static str = "ndarray";

    type Buffer = Array2<f32>;
    type Context = NdarrayContext;
    type Session = ();

    fn new() -> Result<Arc<Self::Context>> {
        Ok(Arc::new(NdarrayContext))
    }

    fn open_session(_ctx: &Self::Context) -> Result<Self::Session> {
        Ok(())
    }

    fn allocate_buffer(
        _ctx: &Self::Context,
        rows: usize,
        cols: usize,
        data: Option<&[f32]>,
    ) -> Result<Self::Buffer> {
        match data {
            Some(data) => Array2::from_shape_vec((rows, cols), data.to_vec())
                .map_err(|e| BenchError::BufferError(e.to_string())),
            None => Ok(Array2::zeros((rows, cols))),
        }
    }

    fn read_buffer(_ctx: &Self::Context, buffer: &Self::Buffer) -> Result<Vec<f32>> {
        Ok(buffer.iter().copied().collect())
    }

    fn matmul(
        _session: &Self::Session,
        a: &Self::Buffer,
        b: &Self::Buffer,
        m: usize,
        n: usize,
        k: usize,
    ) -> Result<Self::Buffer> {
        if a.dim() != (m, k) || b.dim() != (k, n) {
            return Err(BenchError::ShapeMismatch(format!(
                "Cannot multiply {:?} by {:?} into [{}, {}]",
                a.dim(),
                b.dim(),
                m,
                n
            )));
        }

        Ok(a.dot(b))
    }

    fn element_wise_add(
        _session: &Self::Session,
        a: &Self::Buffer,
        b: &Self::Buffer,
        size: usize,
    ) -> Result<Self::Buffer> {
        if a.dim() != b.dim() || a.len() != size {
            return Err(BenchError::BufferError("Buffer size mismatch".into()));
        }

        Ok(a + b)
    }

    fn exp(_session: &Self::Session, input: &Self::Buffer, size: usize) -> Result<Self::Buffer> {
        if input.len() != size {
            return Err(BenchError::BufferError("Buffer size mismatch".into()));
        }

        Ok(input.mapv(f32::exp))
    }

    fn sum(_session: &Self::Session, input: &Self::Buffer) -> Result<f32> {
        Ok(input.sum())
    }

    fn mean(_session: &Self::Session, input: &Self::Buffer) -> Result<f32> {
        input.mean().ok_or(BenchError::EmptyReduction("mean"))
    }

    fn min(_session: &Self::Session, input: &Self::Buffer) -> Result<f32> {
        input
            .iter()
            .copied()
            .reduce(f32::min)
            .ok_or(BenchError::EmptyReduction("min"))
    }
}
