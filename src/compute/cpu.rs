use super::ComputeBackend;
use crate::error::{BenchError, Result};
use std::sync::Arc;

#[derive(Debug)]
pub struct CPUContext;

impl CPUContext {
    pub fn new() -> Self {
        Self
    }
}

impl Default for CPUContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Scalar reference kernels over plain row-major vectors.
pub struct CPUBackend;

impl ComputeBackend for CPUBackend {
    const NAME: &'static str = "cpu";

    type Buffer = Vec<f32>;
    type Context = CPUContext;
    type Session = ();

    fn new() -> Result<Arc<Self::Context>> {
        Ok(Arc::new(CPUContext::new()))
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
        let size = rows * cols;
        match data {
            Some(data) if data.len() != size => {
                Err(BenchError::BufferError("Data size mismatch".into()))
            }
            Some(data) => Ok(data.to_vec()),
            None => Ok(vec![0.0; size]),
        }
    }

    fn read_buffer(_ctx: &Self::Context, buffer: &Self::Buffer) -> Result<Vec<f32>> {
        Ok(buffer.clone())
    }

    fn matmul(
        _session: &Self::Session,
        a: &Self::Buffer,
        b: &Self::Buffer,
        m: usize,
        n: usize,
        k: usize,
    ) -> Result<Self::Buffer> {
        if a.len() != m * k || b.len() != k * n {
            return Err(BenchError::BufferError("Buffer size mismatch".into()));
        }

        let mut c = vec![0.0; m * n];

        // i-k-j order keeps the inner loop sequential over rows of B and C
        for i in 0..m {
            let c_row = &mut c[i * n..(i + 1) * n];
            for p in 0..k {
                let a_ip = a[i * k + p];
                let b_row = &b[p * n..(p + 1) * n];
                for (c_ij, &b_pj) in c_row.iter_mut().zip(b_row) {
                    *c_ij += a_ip * b_pj;
                }
            }
        }

        Ok(c)
    }

    fn element_wise_add(
        _session: &Self::Session,
        a: &Self::Buffer,
        b: &Self::Buffer,
        size: usize,
    ) -> Result<Self::Buffer> {
        if a.len() != size || b.len() != size {
            return Err(BenchError::BufferError("Buffer size mismatch".into()));
        }

        Ok(a.iter().zip(b.iter()).map(|(x, y)| x + y).collect())
    }

    fn exp(_session: &Self::Session, input: &Self::Buffer, size: usize) -> Result<Self::Buffer> {
        if input.len() != size {
            return Err(BenchError::BufferError("Buffer size mismatch".into()));
        }

        Ok(input.iter().map(|x| x.exp()).collect())
    }

    fn sum(_session: &Self::Session, input: &Self::Buffer) -> Result<f32> {
        Ok(input.iter().sum())
    }

    fn mean(session: &Self::Session, input: &Self::Buffer) -> Result<f32> {
        if input.is_empty() {
            return Err(BenchError::EmptyReduction("mean"));
        }
        Ok(Self::sum(session, input)? / input.len() as f32)
    }

    fn min(_session: &Self::Session, input: &Self::Buffer) -> Result<f32> {
        input
            .iter()
            .copied()
            .reduce(f32::min)
            .ok_or(BenchError::EmptyReduction("min"))
    }
}
