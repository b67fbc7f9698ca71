//! # Módulo del Servidor HTTP
//! src/server/mod.rs
//!
//! Este módulo implementa el motor de conexiones:
//! 1. `tcp`: escucha, acepta y entrega cada conexión al pool
//! 2. `pool`: workers con cola acotada (503 al saturarse)
//! 3. `connection`: máquina de estados de una conexión
//! 4. `allow_list`: paths válidos, consultados antes del routing

pub mod allow_list;
pub mod connection;
pub mod pool;
pub mod tcp;

// Re-exportar para facilitar el uso
pub use allow_list::AllowList;
pub use connection::{Connection, ConnectionState, Dispatch, Outcome};
pub use pool::{Rejected, WorkerPool};
pub use tcp::Server;
