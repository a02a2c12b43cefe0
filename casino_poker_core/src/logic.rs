use crate::card::Card;
use crate::deck::{create_deck, Deck};
use crate::error::{PokerError, Result};
use crate::message::{ClientMessage, ServerMessage};
use crate::showdown::{resolve, ShowdownRecord, ShowdownResult, Winner};
use crate::state::*;
use tracing::debug;

// --- 核心牌局流程 ---

impl GameRound {
    /// 给玩家和庄家各发两张底牌，轮流发：玩家、庄家、玩家、庄家
    ///
    /// 只能在 NotStarted 阶段调用。牌堆不足 4 张时一张都不发。
    pub fn deal_hole_cards(&mut self) -> Result<()> {
        self.expect_phase(&[RoundPhase::NotStarted], "发底牌")?;

        let cards = self.deck.draw_many(4)?;
        let (player, dealer): (Vec<_>, Vec<_>) = cards.chunks(2).map(|pair| (pair[0], pair[1])).unzip();
        self.hole_cards.insert(Seat::Player, player);
        self.hole_cards.insert(Seat::Dealer, dealer);
        self.phase = RoundPhase::Dealing;

        debug!(round = %self.id, "底牌已发");
        Ok(())
    }

    /// 翻开下一条街并返回新翻开的牌
    ///
    /// Dealing -> 翻牌(3张)，FlopRevealed -> 转牌(1张)，TurnRevealed -> 河牌(1张)。
    /// 配置了烧牌时每条街先烧一张。牌堆不够时牌局保持原样。
    pub fn reveal_next(&mut self) -> Result<Vec<Card>> {
        let (count, next) = next_street(self.phase)
            .ok_or(PokerError::InvalidPhase { phase: self.phase, action: "翻公共牌" })?;

        let burn = usize::from(self.config.burn_cards);
        if self.deck.remaining() < count + burn {
            return Err(PokerError::EmptyDeck);
        }
        if burn > 0 {
            self.deck.burn()?;
        }
        let cards = self.deck.draw_many(count)?;
        self.shared_cards.extend_from_slice(&cards);
        self.phase = next;

        debug!(round = %self.id, phase = ?next, shared = self.shared_cards.len(), "翻开公共牌");
        Ok(cards)
    }

    /// 连续翻牌直到河牌，返回每条街翻开的牌
    ///
    /// 已经在河牌阶段时返回空列表。牌堆不够翻完所有街时一张都不翻。
    pub fn reveal_remaining(&mut self) -> Result<Vec<(RoundPhase, Vec<Card>)>> {
        self.expect_phase(
            &[RoundPhase::Dealing, RoundPhase::FlopRevealed, RoundPhase::TurnRevealed, RoundPhase::RiverRevealed],
            "翻开剩余公共牌",
        )?;

        let burn = usize::from(self.config.burn_cards);
        let mut needed = 0;
        let mut phase = self.phase;
        while let Some((count, next)) = next_street(phase) {
            needed += count + burn;
            phase = next;
        }
        if self.deck.remaining() < needed {
            return Err(PokerError::EmptyDeck);
        }

        let mut streets = Vec::new();
        while self.phase != RoundPhase::RiverRevealed {
            let cards = self.reveal_next()?;
            streets.push((self.phase, cards));
        }
        Ok(streets)
    }

    /// 从本局牌堆顶抽一张牌，摊牌后不再允许
    pub fn draw(&mut self) -> Result<Card> {
        if self.phase >= RoundPhase::Showdown {
            return Err(PokerError::InvalidPhase { phase: self.phase, action: "抽牌" });
        }
        self.deck.draw()
    }

    /// 向奖池加注，返回新的奖池金额
    pub fn add_to_pot(&mut self, amount: u64) -> Result<u64> {
        if self.phase >= RoundPhase::Showdown {
            return Err(PokerError::InvalidPhase { phase: self.phase, action: "加注" });
        }
        self.pot = self
            .pot
            .checked_add(amount)
            .ok_or_else(|| PokerError::InvalidArgument("奖池金额溢出".to_string()))?;
        Ok(self.pot)
    }

    /// 摊牌：分别评估双方牌池并比较
    pub fn showdown(&mut self) -> Result<&ShowdownResult> {
        self.expect_phase(&[RoundPhase::RiverRevealed], "摊牌")?;

        let result = resolve(&self.pool(Seat::Player), &self.pool(Seat::Dealer))?;
        debug!(round = %self.id, winner = ?result.winner, "摊牌完成");
        self.phase = RoundPhase::Showdown;
        Ok(&*self.result.insert(result))
    }

    /// 按摊牌结果分配奖池，之后牌局进入终态
    ///
    /// 平局时平分，奇数的一个筹码归玩家。
    pub fn settle(&mut self) -> Result<Settlement> {
        self.expect_phase(&[RoundPhase::Showdown], "结算")?;
        let winner = self
            .result
            .as_ref()
            .map(|result| result.winner)
            .ok_or(PokerError::InvalidPhase { phase: self.phase, action: "结算" })?;

        let (player_share, dealer_share) = match winner {
            Winner::Player => (self.pot, 0),
            Winner::Dealer => (0, self.pot),
            Winner::Tie => {
                let half = self.pot / 2;
                (half + self.pot % 2, half)
            }
        };
        self.pot = 0;
        self.phase = RoundPhase::Settled;

        debug!(round = %self.id, ?winner, player_share, dealer_share, "结算完成");
        Ok(Settlement { winner, player_share, dealer_share })
    }

    /// 用新牌堆重新开始：清空底牌、公共牌、奖池和结果
    pub fn reset(&mut self, deck: Deck) {
        *self = GameRound::new(deck, self.config.clone());
    }

    /// 按本局配置生成新牌堆并重新开始
    pub fn restart(&mut self) -> Result<()> {
        let deck = create_deck(self.config.deck_count)?;
        self.reset(deck);
        Ok(())
    }

    /// 处理客户端发来的一条指令
    ///
    /// 返回需要回给客户端的消息。出错时牌局保持原样，只回一条 Error。
    pub fn handle_client_message(&mut self, msg: ClientMessage) -> Vec<ServerMessage> {
        match self.apply(msg) {
            Ok(messages) => messages,
            Err(e) => {
                debug!(round = %self.id, error = %e, "指令被拒绝");
                vec![ServerMessage::Error { message: e.to_string() }]
            }
        }
    }

    fn apply(&mut self, msg: ClientMessage) -> Result<Vec<ServerMessage>> {
        let messages = match msg {
            ClientMessage::StartRound => {
                self.restart()?;
                vec![
                    ServerMessage::RoundStarted { round_id: self.id },
                    ServerMessage::RoundSnapshot(self.view()),
                ]
            }
            ClientMessage::DealHoleCards => {
                self.deal_hole_cards()?;
                vec![ServerMessage::HoleCardsDealt { cards: self.hole_cards(Seat::Player).to_vec() }]
            }
            ClientMessage::RevealNext => {
                let cards = self.reveal_next()?;
                vec![ServerMessage::CommunityCardsDealt { phase: self.phase, cards }]
            }
            ClientMessage::RevealRemaining => self
                .reveal_remaining()?
                .into_iter()
                .map(|(phase, cards)| ServerMessage::CommunityCardsDealt { phase, cards })
                .collect(),
            ClientMessage::AddToPot { amount } => {
                let pot = self.add_to_pot(amount)?;
                vec![ServerMessage::PotUpdated { pot }]
            }
            ClientMessage::Showdown => {
                let record = ShowdownRecord::from(self.showdown()?);
                vec![ServerMessage::Showdown(record)]
            }
            ClientMessage::Settle => vec![ServerMessage::Settled(self.settle()?)],
            ClientMessage::GetRound => vec![ServerMessage::RoundSnapshot(self.view())],
        };
        Ok(messages)
    }

    fn expect_phase(&self, allowed: &[RoundPhase], action: &'static str) -> Result<()> {
        if allowed.contains(&self.phase) {
            Ok(())
        } else {
            Err(PokerError::InvalidPhase { phase: self.phase, action })
        }
    }
}

/// 当前阶段之后的一条街：(翻开张数, 翻开后的阶段)
fn next_street(phase: RoundPhase) -> Option<(usize, RoundPhase)> {
    match phase {
        RoundPhase::Dealing => Some((3, RoundPhase::FlopRevealed)),
        RoundPhase::FlopRevealed => Some((1, RoundPhase::TurnRevealed)),
        RoundPhase::TurnRevealed => Some((1, RoundPhase::RiverRevealed)),
        _ => None,
    }
}

// --- 单元测试 ---
