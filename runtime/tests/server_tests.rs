use std::sync::Arc;
use std::time::Duration;

use futures_util::StreamExt;
use market::{Distributor, Frame};
use runtime::{bind, serve};
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;

#[tokio::test]
async fn listener_receives_published_frames() {
	let listener = bind("127.0.0.1:0".parse().unwrap()).await.unwrap();
	let addr = listener.local_addr().unwrap();
	let distributor = Arc::new(Distributor::new(16));
	tokio::spawn(serve(listener, Arc::clone(&distributor)));

	let (mut ws, _) = connect_async(format!("ws://{addr}")).await.unwrap();

	// 等待服务端完成握手并订阅
	let mut waited = 0;
	while distributor.subscriber_count() == 0 && waited < 100 {
		tokio::time::sleep(Duration::from_millis(10)).await;
		waited += 1;
	}
	assert_eq!(distributor.subscriber_count(), 1);

	let frame: Frame = Arc::from(r#"{"600038":[]}"#);
	assert_eq!(distributor.publish(frame), 1);

	let message = tokio::time::timeout(Duration::from_secs(2), ws.next())
		.await
		.expect("frame in time")
		.expect("stream open")
		.expect("valid message");
	assert_eq!(message, Message::Text(r#"{"600038":[]}"#.to_string()));
}
