use super::ComputeBackend;
use crate::error::{BenchError, Result};
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use std::sync::Arc;
use std::thread;

#[derive(Debug)]
pub struct RayonContext {
    num_threads: usize,
}

impl RayonContext {
    pub fn new(num_threads: usize) -> Self {
        Self {
            num_threads: num_threads.max(1),
        }
    }

    pub fn num_threads(&self) -> usize {
        self.num_threads
    }
}

impl Default for RayonContext {
    fn default() -> Self {
        Self::new(thread::available_parallelism().map_or(1, |n| n.get()))
    }
}

/// Data-parallel kernels. Each operation runs inside its own thread pool,
/// built when the session opens and torn down when it is dropped.
pub struct RayonBackend;

impl ComputeBackend for RayonBackend {
    const NAME: &'static str = "rayon";

    type Buffer = Vec<f32>;
    type Context = RayonContext;
    type Session = ThreadPool;

    fn new() -> Result<Arc<Self::Context>> {
        Ok(Arc::new(RayonContext::default()))
    }

    fn open_session(ctx: &Self::Context) -> Result<Self::Session> {
        let pool = ThreadPoolBuilder::new()
            .num_threads(ctx.num_threads)
            .thread_name(|idx| format!("linbench-rayon-{idx}"))
            .build()?;
        Ok(pool)
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
        session: &Self::Session,
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
        if n == 0 {
            return Ok(c);
        }

        session.install(|| {
            c.par_chunks_mut(n).enumerate().for_each(|(i, c_row)| {
                for p in 0..k {
                    let a_ip = a[i * k + p];
                    let b_row = &b[p * n..(p + 1) * n];
                    for (c_ij, &b_pj) in c_row.iter_mut().zip(b_row) {
                        *c_ij += a_ip * b_pj;
                    }
                }
            })
        });

        Ok(c)
    }

    fn element_wise_add(
        session: &Self::Session,
        a: &Self::Buffer,
        b: &Self::Buffer,
        size: usize,
    ) -> Result<Self::Buffer> {
        if a.len() != size || b.len() != size {
            return Err(BenchError::BufferError("Buffer size mismatch".into()));
        }

        Ok(session.install(|| {
            a.par_iter()
                .zip(b.par_iter())
                .map(|(x, y)| x + y)
                .collect::<Vec<f32>>()
        }))
    }

    fn exp(session: &Self::Session, input: &Self::Buffer, size: usize) -> Result<Self::Buffer> {
        if input.len() != size {
            return Err(BenchError::BufferError("Buffer size mismatch".into()));
        }

        Ok(session.install(|| {
            input.par_iter().map(|x| x.exp()).collect::<Vec<f32>>()
        }))
    }

    fn sum(session: &Self::Session, input: &Self::Buffer) -> Result<f32> {
        Ok(session.install(|| input.par_iter().sum::<f32>()))
    }

    fn mean(session: &Self::Session, input: &Self::Buffer) -> Result<f32> {
        if input.is_empty() {
            return Err(BenchError::EmptyReduction("mean"));
        }
        Ok(Self::sum(session, input)? / input.len() as f32)
    }

    fn min(session: &Self::Session, input: &Self::Buffer) -> Result<f32> {
        session
            .install(|| input.par_iter().copied().reduce_with(f32::min))
            .ok_or(BenchError::EmptyReduction("min"))
    }
}
