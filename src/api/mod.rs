/*!
 * API Module
 * gRPC transport surface and per-connection adapters
 */

pub mod broadcast;
pub mod gate;
pub mod grpc_server;
pub mod types;

pub use broadcast::run_output_broadcaster;
pub use gate::{run_input_gate, InboundFrame, QUEUE_FULL_NOTICE};
pub use grpc_server::start_grpc_server;
pub use types::{ApiError, ApiResult, ServerConfig};
