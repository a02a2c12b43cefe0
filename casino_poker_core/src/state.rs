use crate::card::Card;
use crate::deck::{create_deck, Deck};
use crate::error::Result;
use crate::showdown::{ShowdownRecord, ShowdownResult, Winner};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

pub type RoundId = Uuid;

/// 座位：单挑局只有玩家和庄家
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Seat {
    Player,
    Dealer,
}

/// 一局的阶段，只能按顺序前进
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RoundPhase {
    NotStarted,
    Dealing,       // 已发底牌
    FlopRevealed,  // 翻牌
    TurnRevealed,  // 转牌
    RiverRevealed, // 河牌
    Showdown,
    Settled, // 结算完成，终态
}

/// 牌局配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoundConfig {
    /// 每局使用几副牌
    pub deck_count: usize,
    /// 每条街发牌前是否先烧一张
    pub burn_cards: bool,
}

impl Default for RoundConfig {
    fn default() -> Self {
        RoundConfig { deck_count: 1, burn_cards: false }
    }
}

/// 结算结果：平局时奖池平分，多出的一个筹码归玩家
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settlement {
    pub winner: Winner,
    pub player_share: u64,
    pub dealer_share: u64,
}

/// 一局单挑扑克的全部可变状态
///
/// 每局独占自己的牌堆和已发出的牌，不与其他牌局共享。
/// 同一局的操作必须串行执行。
#[derive(Debug, Clone)]
pub struct GameRound {
    pub(crate) id: RoundId,
    pub(crate) config: RoundConfig,
    // 牌堆只在服务端内存中，永远不会发给客户端
    pub(crate) deck: Deck,
    // 公共牌，0 到 5 张，只增不减
    pub(crate) shared_cards: Vec<Card>,
    pub(crate) hole_cards: HashMap<Seat, Vec<Card>>,
    pub(crate) pot: u64,
    pub(crate) phase: RoundPhase,
    pub(crate) result: Option<ShowdownResult>,
}

/// 发给玩家的牌局快照
///
/// 摊牌之前庄家的底牌为 None；牌堆只给出剩余张数。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundView {
    pub round_id: RoundId,
    pub phase: RoundPhase,
    pub pot: u64,
    pub shared_cards: Vec<Card>,
    pub player_cards: Vec<Card>,
    pub dealer_cards: Vec<Option<Card>>,
    pub remaining_cards: usize,
    pub result: Option<ShowdownRecord>,
}

// --- GameRound 的实现方法 ---

impl GameRound {
    /// 用给定牌堆开一局
    pub fn new(deck: Deck, config: RoundConfig) -> Self {
        GameRound {
            id: Uuid::new_v4(),
            config,
            deck,
            shared_cards: Vec::with_capacity(5),
            hole_cards: HashMap::new(),
            pot: 0,
            phase: RoundPhase::NotStarted,
            result: None,
        }
    }

    /// 按配置新建并洗好牌堆后开一局
    pub fn start(config: RoundConfig) -> Result<Self> {
        let deck = create_deck(config.deck_count)?;
        Ok(GameRound::new(deck, config))
    }

    /// 同 [`GameRound::start`]，但使用注入的随机源
    pub fn start_with_rng<R: Rng + ?Sized>(config: RoundConfig, rng: &mut R) -> Result<Self> {
        let deck = Deck::with_rng(config.deck_count, rng)?;
        Ok(GameRound::new(deck, config))
    }

    pub fn id(&self) -> RoundId {
        self.id
    }

    pub fn config(&self) -> &RoundConfig {
        &self.config
    }

    pub fn phase(&self) -> RoundPhase {
        self.phase
    }

    pub fn pot(&self) -> u64 {
        self.pot
    }

    pub fn shared_cards(&self) -> &[Card] {
        &self.shared_cards
    }

    pub fn hole_cards(&self, seat: Seat) -> &[Card] {
        self.hole_cards.get(&seat).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn remaining_cards(&self) -> usize {
        self.deck.remaining()
    }

    pub fn result(&self) -> Option<&ShowdownResult> {
        self.result.as_ref()
    }

    /// 某个座位可用于评估的全部牌：底牌 + 已翻开的公共牌
    pub fn pool(&self, seat: Seat) -> Vec<Card> {
        self.hole_cards(seat).iter().chain(&self.shared_cards).copied().collect()
    }

    /// 生成发给玩家的快照，隐藏摊牌前的庄家底牌
    pub fn view(&self) -> RoundView {
        let revealed = matches!(self.phase, RoundPhase::Showdown | RoundPhase::Settled);
        let dealer_cards = self
            .hole_cards(Seat::Dealer)
            .iter()
            .map(|&card| revealed.then_some(card))
            .collect();

        RoundView {
            round_id: self.id,
            phase: self.phase,
            pot: self.pot,
            shared_cards: self.shared_cards.clone(),
            player_cards: self.hole_cards(Seat::Player).to_vec(),
            dealer_cards,
            remaining_cards: self.deck.remaining(),
            result: self.result.as_ref().map(ShowdownRecord::from),
        }
    }
}
