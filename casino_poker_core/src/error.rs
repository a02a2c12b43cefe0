use crate::state::RoundPhase;
use thiserror::Error;

/// 牌局核心的错误类型
///
/// 所有错误都是局部的、可恢复的，由调用方（牌局驱动）决定重发还是中止。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PokerError {
    /// 参数非法，例如牌副数为 0
    #[error("参数非法: {0}")]
    InvalidArgument(String),
    /// 牌堆已空
    #[error("牌堆已空，无法继续发牌")]
    EmptyDeck,
    /// 评估牌型至少需要 5 张牌
    #[error("牌数不足: 需要至少 5 张，实际 {found} 张")]
    InsufficientCards { found: usize },
    /// 花色或点数缺失/无法识别
    #[error("无效的牌: {0}")]
    InvalidCard(String),
    /// 当前阶段不允许该操作
    #[error("当前阶段 {phase:?} 不能执行 {action}")]
    InvalidPhase { phase: RoundPhase, action: &'static str },
}

pub type Result<T> = std::result::Result<T, PokerError>;
