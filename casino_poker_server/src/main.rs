mod config;

use std::sync::Arc;

use axum::{
    extract::{
        ws::{Message, WebSocket},
        Path, State, WebSocketUpgrade,
    },
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use dashmap::DashMap;
use futures_util::{stream::StreamExt, SinkExt};
use tokio::sync::{mpsc, Mutex};
use tracing::info;
use tracing_subscriber::EnvFilter;

use casino_poker_core::{ClientMessage, GameRound, RoundId, RoundView, ServerMessage};
use config::ServerConfig;

// 服务器全局状态。每个连接独占一局牌，注册表只用于按 id 查询快照。
struct AppState {
    rounds: DashMap<RoundId, Arc<Mutex<GameRound>>>,
    config: ServerConfig,
}

type SharedState = Arc<AppState>;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = ServerConfig::from_env()?;
    let addr = config.bind_addr;
    info!(deck_count = config.round.deck_count, burn_cards = config.round.burn_cards, "牌局配置");

    let state = SharedState::new(AppState {
        rounds: DashMap::new(),
        config,
    });

    let app = Router::new()
        .route("/ws", get(websocket_handler))
        .route("/rounds/{id}", get(round_snapshot))
        .with_state(state);

    info!("服务器正在监听 {}", addr);
    axum::serve(tokio::net::TcpListener::bind(addr).await?, app).await?;
    Ok(())
}

/// 处理 WebSocket 连接请求
async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<SharedState>,
) -> impl IntoResponse {
    ws.on_upgrade(|socket| handle_socket(socket, state))
}

/// 查询某一局的快照（庄家底牌在摊牌前隐藏）
async fn round_snapshot(
    Path(id): Path<RoundId>,
    State(state): State<SharedState>,
) -> Result<Json<RoundView>, StatusCode> {
    // 先把 Arc 拿出来，避免跨 await 持有 DashMap 的分片锁
    let round = state
        .rounds
        .get(&id)
        .map(|entry| entry.value().clone())
        .ok_or(StatusCode::NOT_FOUND)?;
    let view = round.lock().await.view();
    Ok(Json(view))
}

/// 处理单个 WebSocket 连接的生命周期
async fn handle_socket(socket: WebSocket, state: SharedState) {
    let (mut sender, mut receiver) = socket.split();

    // 创建一个 MPSC 通道，用于从其他任务接收要发送的消息
    let (tx, mut rx) = mpsc::channel::<ServerMessage>(32);

    // 启动一个新任务，专门负责将 MPSC 通道中的消息发送到 WebSocket
    tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            let payload = match serde_json::to_string(&msg) {
                Ok(payload) => payload,
                Err(e) => {
                    tracing::warn!("序列化消息失败: {}", e);
                    continue;
                }
            };
            if sender.send(Message::Text(payload.into())).await.is_err() {
                // 发送失败，说明客户端已断开，退出任务
                break;
            }
        }
    });

    // 每个连接独占一局，互不共享牌堆
    let round = match GameRound::start(state.config.round.clone()) {
        Ok(round) => round,
        Err(e) => {
            tracing::warn!("创建牌局失败: {}", e);
            let _ = tx.send(ServerMessage::Error { message: e.to_string() }).await;
            return;
        }
    };
    let mut round_id = round.id();
    let round = Arc::new(Mutex::new(round));
    state.rounds.insert(round_id, round.clone());
    info!("新连接，创建牌局 {}", round_id);
    let _ = tx.send(ServerMessage::RoundStarted { round_id }).await;

    // 主循环，处理从客户端接收到的消息
    'recv: while let Some(Ok(msg)) = receiver.next().await {
        if let Message::Text(text) = msg {
            match serde_json::from_str::<ClientMessage>(text.as_str()) {
                Ok(client_msg) => {
                    let (replies, current_id) = {
                        let mut round = round.lock().await;
                        let replies = round.handle_client_message(client_msg);
                        (replies, round.id())
                    };

                    // StartRound 会换一个新的牌局 id，注册表同步更新
                    if current_id != round_id {
                        state.rounds.remove(&round_id);
                        state.rounds.insert(current_id, round.clone());
                        info!("牌局 {} 已结束，新牌局 {}", round_id, current_id);
                        round_id = current_id;
                    }

                    if !forward_replies(&tx, replies).await {
                        // 写任务已退出，连接不可用
                        break 'recv;
                    }
                }
                Err(e) => {
                    tracing::warn!("解析消息失败: {}", e);
                    let _ = tx.send(ServerMessage::Error { message: format!("无法解析的消息: {}", e) }).await;
                }
            }
        }
    }

    // 客户端断开连接，牌局随之销毁
    state.rounds.remove(&round_id);
    info!("客户端连接关闭，牌局 {} 已移除", round_id);
}

/// 把回复依次交给写任务。写任务已退出时返回 false
async fn forward_replies(tx: &mpsc::Sender<ServerMessage>, replies: Vec<ServerMessage>) -> bool {
    for reply in replies {
        if tx.send(reply).await.is_err() {
            return false;
        }
    }
    true
}
