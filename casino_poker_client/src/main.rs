use futures_util::{SinkExt, StreamExt};
use std::io::Write;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio_tungstenite::{connect_async, tungstenite::protocol::Message};
use url::Url;

use casino_poker_core::{Card, ClientMessage, ServerMessage};

const SERVER_URL_VAR: &str = "POKER_SERVER_URL";
const DEFAULT_SERVER_URL: &str = "ws://127.0.0.1:25917/ws";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let url = std::env::var(SERVER_URL_VAR).unwrap_or_else(|_| DEFAULT_SERVER_URL.to_string());
    let url = Url::parse(&url)?;

    println!("正在连接到: {}", url);
    let (ws_stream, _) = connect_async(url.as_str()).await?;
    println!("连接成功!");

    let (mut write, mut read) = ws_stream.split();

    // 启动一个任务来处理从服务器接收的消息
    tokio::spawn(async move {
        while let Some(msg) = read.next().await {
            match msg {
                Ok(Message::Text(text)) => {
                    match serde_json::from_str::<ServerMessage>(text.as_str()) {
                        Ok(server_msg) => {
                            println!("\n<-- {}\n", describe(&server_msg));
                            print!("> "); // 重新显示输入提示符
                            let _ = std::io::stdout().flush();
                        }
                        Err(e) => eprintln!("解析服务器消息失败: {}", e),
                    }
                }
                Ok(_) => {}
                Err(e) => {
                    eprintln!("接收消息时出错: {}", e);
                    break;
                }
            }
        }
    });

    // 主任务处理用户输入
    let mut stdin = BufReader::new(tokio::io::stdin()).lines();

    println!("--- 单挑扑克客户端 ---");
    println!("可用命令:");
    println!("  start                     - 用新牌堆开始新的一局");
    println!("  deal                      - 发底牌");
    println!("  next                      - 翻开下一条街");
    println!("  rest                      - 翻开剩余公共牌");
    println!("  pot <金额>                - 向奖池加注");
    println!("  showdown                  - 摊牌");
    println!("  settle                    - 结算");
    println!("  round                     - 查看牌局");
    println!("  exit                      - 退出");

    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let Some(line) = stdin.next_line().await? else {
            break;
        };
        let parts: Vec<&str> = line.split_whitespace().collect();

        let client_msg = match parts.first().copied() {
            Some("start") => ClientMessage::StartRound,
            Some("deal") => ClientMessage::DealHoleCards,
            Some("next") => ClientMessage::RevealNext,
            Some("rest") => ClientMessage::RevealRemaining,
            Some("pot") => match parts.get(1).map(|s| s.parse::<u64>()) {
                Some(Ok(amount)) => ClientMessage::AddToPot { amount },
                _ => {
                    println!("用法: pot <金额>");
                    continue;
                }
            },
            Some("showdown") => ClientMessage::Showdown,
            Some("settle") => ClientMessage::Settle,
            Some("round") => ClientMessage::GetRound,
            Some("exit") => {
                println!("正在断开连接...");
                break;
            }
            None => continue,
            _ => {
                println!("未知命令: {}", line);
                continue;
            }
        };

        let payload = serde_json::to_string(&client_msg)?;
        write.send(Message::Text(payload.into())).await?;
    }

    Ok(())
}

fn cards(cards: &[Card]) -> String {
    cards.iter().map(Card::to_string).collect::<Vec<_>>().join(" ")
}

/// 把服务器消息转成便于阅读的一行文字
fn describe(msg: &ServerMessage) -> String {
    match msg {
        ServerMessage::RoundStarted { round_id } => format!("新的一局: {}", round_id),
        ServerMessage::HoleCardsDealt { cards: hole } => format!("你的底牌: {}", cards(hole)),
        ServerMessage::CommunityCardsDealt { phase, cards: shared } => {
            format!("{:?}: {}", phase, cards(shared))
        }
        ServerMessage::PotUpdated { pot } => format!("奖池: {}", pot),
        ServerMessage::Showdown(record) => format!(
            "摊牌 -> {:?}\n    玩家 {}: {}\n    庄家 {}: {}",
            record.winner,
            record.player_category,
            cards(&record.player_best_five),
            record.dealer_category,
            cards(&record.dealer_best_five),
        ),
        ServerMessage::Settled(settlement) => format!(
            "结算 -> {:?}，玩家得 {}，庄家得 {}",
            settlement.winner, settlement.player_share, settlement.dealer_share
        ),
        ServerMessage::Error { message } => format!("错误: {}", message),
        other => format!("{:#?}", other),
    }
}
