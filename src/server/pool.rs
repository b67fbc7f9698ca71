//! # Pool de Workers
//! src/server/pool.rs
//!
//! Pool de tamaño fijo con cola acotada. Cada worker es un thread con nombre
//! (`worker-N`) que toma elementos de la cola y ejecuta el mismo job.
//!
//! ## Política de saturación
//!
//! `submit` nunca bloquea: si la cola está llena devuelve el elemento en
//! `Rejected` y el llamador decide qué hacer (el accept loop responde 503).
//!
//! ```text
//! accept loop ──submit──▶ [ cola acotada ] ──▶ worker-0
//!                                          ──▶ worker-1
//!                                          ──▶ ...
//! ```

use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};
use std::io;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use tracing::{debug, error};

/// Elemento devuelto porque la cola estaba llena
#[derive(Debug)]
pub struct Rejected<T>(pub T);

/// Pool de workers con cola acotada
pub struct WorkerPool<T> {
    /// `None` solo durante el drop
    sender: Option<Sender<T>>,
    workers: Vec<JoinHandle<()>>,
}

impl<T: Send + 'static> WorkerPool<T> {
    /// Lanza `size` workers que ejecutan `job` para cada elemento
    pub fn new<F>(size: usize, queue_capacity: usize, job: F) -> io::Result<Self>
    where
        F: Fn(T) + Send + Sync + 'static,
    {
        let (sender, receiver) = bounded(queue_capacity);
        let job = Arc::new(job);
        let mut workers = Vec::with_capacity(size);

        for id in 0..size {
            let receiver = receiver.clone();
            let job = Arc::clone(&job);
            let handle = thread::Builder::new()
                .name(format!("worker-{}", id))
                .spawn(move || worker_loop(id, receiver, job))?;
            workers.push(handle);
        }

        Ok(Self {
            sender: Some(sender),
            workers,
        })
    }

    /// Encola un elemento sin bloquear
    pub fn submit(&self, item: T) -> Result<(), Rejected<T>> {
        match &self.sender {
            Some(sender) => sender.try_send(item).map_err(|e| match e {
                TrySendError::Full(item) | TrySendError::Disconnected(item) => Rejected(item),
            }),
            None => Err(Rejected(item)),
        }
    }

    /// Cantidad de workers
    pub fn size(&self) -> usize {
        self.workers.len()
    }

    /// Elementos esperando worker
    pub fn queued(&self) -> usize {
        self.sender.as_ref().map_or(0, Sender::len)
    }
}

fn worker_loop<T, F>(id: usize, receiver: Receiver<T>, job: Arc<F>)
where
    F: Fn(T),
{
    debug!(worker = id, "worker iniciado");

    for item in receiver.iter() {
        // Un job que hace panic no se lleva al worker
        if panic::catch_unwind(AssertUnwindSafe(|| (*job)(item))).is_err() {
            error!(worker = id, "job terminó en panic");
        }
    }

    debug!(worker = id, "worker detenido");
}

impl<T> Drop for WorkerPool<T> {
    /// Cierra la cola y espera a que los workers terminen lo pendiente
    fn drop(&mut self) {
        drop(self.sender.take());
        for handle in self.workers.drain(..) {
            let _ = handle.join();
        }
    }
}
