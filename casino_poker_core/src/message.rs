use crate::card::Card;
use crate::showdown::ShowdownRecord;
use crate::state::{RoundId, RoundPhase, RoundView, Settlement};
use serde::{Deserialize, Serialize};

// --- 客户端 -> 服务器 的消息 ---
// 驱动一局牌的指令，服务器按顺序应用到该连接自己的牌局上。

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub enum ClientMessage {
    /// 丢弃当前牌局，用新牌堆开始新的一局
    StartRound,
    /// 给玩家和庄家各发两张底牌
    DealHoleCards,
    /// 翻开下一条街（翻牌 / 转牌 / 河牌）
    RevealNext,
    /// 一次性翻开剩余的公共牌
    RevealRemaining,
    /// 向奖池加注
    AddToPot { amount: u64 },
    /// 摊牌比大小
    Showdown,
    /// 结算奖池
    Settle,
    /// 获取当前牌局快照
    GetRound,
}

// --- 服务器 -> 客户端 的消息 ---

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub enum ServerMessage {
    /// 新的一局开始
    RoundStarted { round_id: RoundId },

    /// 玩家自己的底牌
    HoleCardsDealt { cards: Vec<Card> },

    /// 发出公共牌 (翻牌、转牌、河牌)
    CommunityCardsDealt {
        phase: RoundPhase,
        cards: Vec<Card>,
    },

    PotUpdated { pot: u64 },

    /// 摊牌阶段，公布结果
    Showdown(ShowdownRecord),

    Settled(Settlement),

    /// 牌局快照，庄家底牌在摊牌前隐藏
    RoundSnapshot(RoundView),

    Error { message: String },
}
