//! Estado do painel (lado cliente) e o protocolo de mutação otimista.
//!
//! O [`ClientSession`] aplica cada criação/remoção localmente antes da
//! resposta do servidor e depois confirma ou desfaz. O transporte fica atrás
//! do trait [`BarberApi`]; [`HttpApi`] é a implementação com `reqwest`.

pub mod api;
pub mod error;
pub mod http;
pub mod list;
pub mod session;
pub mod state;

pub use api::BarberApi;
pub use error::ClientError;
pub use http::{ClientConfig, HttpApi};
pub use list::{EntityKey, EntityList, Keyed};
pub use session::ClientSession;
pub use state::ClientState;
