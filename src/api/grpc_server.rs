/*!
 * gRPC Server
 * Exposes the relay pipe to clients via gRPC streaming
 */

use std::sync::Arc;
use std::time::Duration;
use futures::StreamExt;
use tokio_stream::wrappers::ReceiverStream;
use tonic::{transport::Server, Request, Response, Status, Streaming};
use tracing::info;

use crate::api::broadcast::run_output_broadcaster;
use crate::api::gate::{run_input_gate, InboundFrame};
use crate::api::types::{ApiResult, ServerConfig};
use crate::pipe::PipeConnectionManager;

// Include generated protobuf code
pub mod relay_proto {
    tonic::include_proto!("relay");
}

use relay_proto::relay_service_server::{RelayService, RelayServiceServer};
use relay_proto::{
    prompt_frame, PingRequest, PingResponse, PromptFrame, Reply, StreamRepliesRequest,
    SubmitNotice,
};

/// gRPC service implementation
pub struct RelayServiceImpl {
    manager: Arc<PipeConnectionManager>,
}

impl RelayServiceImpl {
    pub fn new(manager: Arc<PipeConnectionManager>) -> Self {
        info!("gRPC service initialized");
        Self { manager }
    }
}

fn frame_from_proto(frame: PromptFrame) -> InboundFrame {
    match frame.frame {
        Some(prompt_frame::Frame::Text(text)) => InboundFrame::Text(text),
        Some(prompt_frame::Frame::Binary(data)) => InboundFrame::Binary(data),
        Some(prompt_frame::Frame::Close(_)) => InboundFrame::Close,
        // An empty oneof is treated like any other non-text frame.
        None => InboundFrame::Binary(Vec::new()),
    }
}

#[tonic::async_trait]
impl RelayService for RelayServiceImpl {
    type SubmitPromptsStream = ReceiverStream<Result<SubmitNotice, Status>>;
    type StreamRepliesStream = ReceiverStream<Result<Reply, Status>>;

    async fn submit_prompts(
        &self,
        request: Request<Streaming<PromptFrame>>,
    ) -> Result<Response<Self::SubmitPromptsStream>, Status> {
        info!("gRPC: input pipe attach requested");
        let frames = request
            .into_inner()
            .map(|frame| frame.map(frame_from_proto));

        // The attach waits out any still-active previous cycle.
        let attachment = self.manager.attach().await;

        let (gate_tx, mut gate_rx) = tokio::sync::mpsc::channel::<String>(16);
        let (tx, rx) = tokio::sync::mpsc::channel(16);

        tokio::spawn(run_input_gate(attachment, frames, gate_tx));
        tokio::spawn(async move {
            while let Some(message) = gate_rx.recv().await {
                if tx.send(Ok(SubmitNotice { message })).await.is_err() {
                    return;
                }
            }
        });

        Ok(Response::new(ReceiverStream::new(rx)))
    }

    async fn stream_replies(
        &self,
        _request: Request<StreamRepliesRequest>,
    ) -> Result<Response<Self::StreamRepliesStream>, Status> {
        info!("gRPC: reply stream attach requested");
        let queue = self.manager.output();

        let (sink_tx, mut sink_rx) = tokio::sync::mpsc::channel::<String>(16);
        let (tx, rx) = tokio::sync::mpsc::channel(16);

        tokio::spawn(run_output_broadcaster(queue, sink_tx));
        tokio::spawn(async move {
            while let Some(text) = sink_rx.recv().await {
                if tx.send(Ok(Reply { text })).await.is_err() {
                    return;
                }
            }
        });

        Ok(Response::new(ReceiverStream::new(rx)))
    }

    async fn ping(
        &self,
        _request: Request<PingRequest>,
    ) -> Result<Response<PingResponse>, Status> {
        Ok(Response::new(PingResponse {
            message: "hello".to_string(),
        }))
    }
}

/// Start the gRPC server and serve until it errors or the process exits.
pub async fn start_grpc_server(
    config: ServerConfig,
    manager: Arc<PipeConnectionManager>,
) -> ApiResult<()> {
    let service = RelayServiceImpl::new(manager);

    info!(addr = %config.address, "gRPC server starting");

    Server::builder()
        .http2_keepalive_interval(Some(Duration::from_secs(config.keepalive_interval_secs)))
        .http2_keepalive_timeout(Some(Duration::from_secs(config.keepalive_timeout_secs)))
        .tcp_nodelay(true)
        .add_service(RelayServiceServer::new(service))
        .serve(config.address)
        .await?;

    Ok(())
}
