pub mod client;
pub mod node_rpc;

pub use client::{HttpDialer, HttpSession};
pub use node_rpc::NodeRpcClient;
