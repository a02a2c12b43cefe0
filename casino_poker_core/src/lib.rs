//! # 赌场扑克核心逻辑库
//!
//! 这个 `core` crate 包含了单挑德州扑克（玩家对庄家）的牌堆生成、
//! 牌型评估、摊牌比较、单局状态管理以及客户端-服务器通信消息的定义。
//! 它不关心账户、余额或网络传输，可以被任何上层应用复用。

mod card;
mod deck;
mod error;
mod evaluation;
mod logic;
mod message;
mod showdown;
mod state;

pub use card::*;

pub use deck::*;

pub use error::*;

pub use evaluation::*;

pub use message::*;

pub use showdown::*;

pub use state::*;
