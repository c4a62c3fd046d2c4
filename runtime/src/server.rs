//! WebSocket 监听服务。
//!
//! 每个连接订阅分发器并把每一帧作为文本消息转发；落后时跳过错过的帧，
//! 对端关闭或出错时安静退出。

use std::net::SocketAddr;
use std::sync::Arc;

use futures_util::{SinkExt, StreamExt};
use market::{Distributor, Frame};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::broadcast::error::RecvError;
use tokio::sync::broadcast::Receiver;
use tokio_tungstenite::accept_async;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, info, warn};

use crate::error::RuntimeError;

pub async fn bind(addr: SocketAddr) -> Result<TcpListener, RuntimeError> {
	let listener = TcpListener::bind(addr).await?;
	info!(addr = %listener.local_addr()?, "websocket listener bound");
	Ok(listener)
}

pub async fn serve(listener: TcpListener, distributor: Arc<Distributor>) -> Result<(), RuntimeError> {
	loop {
		let (stream, peer) = match listener.accept().await {
			Ok(accepted) => accepted,
			Err(err) => {
				warn!(error = %err, "accept failed");
				continue;
			}
		};
		let frames = distributor.subscribe();
		tokio::spawn(handle_client(stream, peer, frames));
	}
}

async fn handle_client(stream: TcpStream, peer: SocketAddr, mut frames: Receiver<Frame>) {
	let ws = match accept_async(stream).await {
		Ok(ws) => ws,
		Err(err) => {
			debug!(%peer, error = %err, "websocket handshake failed");
			return;
		}
	};
	info!(%peer, "listener connected");

	let (mut sink, mut inbound) = ws.split();
	loop {
		tokio::select! {
			frame = frames.recv() => match frame {
				Ok(frame) => {
					if sink.send(Message::Text(frame.to_string())).await.is_err() {
						break;
					}
				}
				Err(RecvError::Lagged(skipped)) => {
					debug!(%peer, skipped, "listener lagging, frames skipped");
				}
				Err(RecvError::Closed) => break,
			},
			message = inbound.next() => match message {
				Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
				Some(Ok(_)) => {}
			},
		}
	}
	info!(%peer, "listener disconnected");
}
