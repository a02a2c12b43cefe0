use crate::card::{cards_from_records, Card, CardRecord};
use crate::error::Result;
use crate::evaluation::{classify, Evaluation, HandCategory};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use tracing::debug;

/// 摊牌胜负
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Winner {
    Player,
    Dealer,
    /// 牌型与每张比较牌的点数都相同，由调用方决定分池
    Tie,
}

/// 摊牌结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShowdownResult {
    pub winner: Winner,
    pub player: Evaluation,
    pub dealer: Evaluation,
}

/// 对外输出的摊牌记录，字段都是可以直接序列化的简单值
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShowdownRecord {
    pub winner: Winner,
    pub player_category: HandCategory,
    pub dealer_category: HandCategory,
    pub player_best_five: [Card; 5],
    pub dealer_best_five: [Card; 5],
}

impl From<&ShowdownResult> for ShowdownRecord {
    fn from(result: &ShowdownResult) -> Self {
        ShowdownRecord {
            winner: result.winner,
            player_category: result.player.category,
            dealer_category: result.dealer.category,
            player_best_five: result.player.best_five,
            dealer_best_five: result.dealer.best_five,
        }
    }
}

/// 分别评估玩家与庄家的牌池并决出胜负
///
/// 先比牌型；牌型相同则按 `best_five` 的顺序逐张比点数，第一处不同决定胜负；
/// 全部相同则为平局。
pub fn resolve(player_pool: &[Card], dealer_pool: &[Card]) -> Result<ShowdownResult> {
    let player = classify(player_pool)?;
    let dealer = classify(dealer_pool)?;

    let winner = match player.compare(&dealer) {
        Ordering::Greater => Winner::Player,
        Ordering::Less => Winner::Dealer,
        Ordering::Equal => Winner::Tie,
    };
    debug!(?winner, player = %player, dealer = %dealer, "摊牌");

    Ok(ShowdownResult { winner, player, dealer })
}

/// 从 Web 层的松散牌数据开始摊牌：先整体校验，任何一张无效都不进入评估
pub fn resolve_records(player_pool: Vec<CardRecord>, dealer_pool: Vec<CardRecord>) -> Result<ShowdownResult> {
    let player = cards_from_records(player_pool)?;
    let dealer = cards_from_records(dealer_pool)?;
    resolve(&player, &dealer)
}

// --- 单元测试 ---

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::{Face::*, Suit::*};
    use crate::card::{Face, Suit};
    use crate::error::PokerError;

    fn card(face: Face, suit: Suit) -> Card {
        Card::new(face, suit)
    }

    #[test]
    fn test_identical_ranks_different_suits_tie() {
        let player = [card(Ace, Spades), card(Ace, Diamonds), card(King, Clubs), card(King, Diamonds), card(Two, Hearts)];
        let dealer = [card(Ace, Clubs), card(Ace, Hearts), card(King, Spades), card(King, Hearts), card(Two, Diamonds)];
        let result = resolve(&player, &dealer).unwrap();
        assert_eq!(result.winner, Winner::Tie);
        assert_eq!(result.player.category, HandCategory::TwoPair);
        assert_eq!(result.dealer.category, HandCategory::TwoPair);
    }

    #[test]
    fn test_higher_category_wins_outright() {
        let player = [card(Two, Hearts), card(Three, Hearts), card(Four, Hearts), card(Five, Hearts), card(Six, Hearts)];
        let dealer = [card(Ace, Spades), card(Ace, Diamonds), card(Ace, Clubs), card(Ace, Hearts), card(King, Hearts)];
        assert_eq!(resolve(&player, &dealer).unwrap().winner, Winner::Player);
        assert_eq!(resolve(&dealer, &player).unwrap().winner, Winner::Dealer);
    }

    #[test]
    fn test_kicker_decides_regardless_of_suit() {
        // 同为一对A，第一踢脚 K 对 Q；花色故意让输家"更大"
        let player = [card(Ace, Hearts), card(Ace, Diamonds), card(King, Hearts), card(Seven, Hearts), card(Four, Hearts)];
        let dealer = [card(Ace, Spades), card(Ace, Clubs), card(Queen, Spades), card(Seven, Spades), card(Four, Spades)];
        let result = resolve(&player, &dealer).unwrap();
        assert_eq!(result.winner, Winner::Player);
        assert_eq!(result.player.category, HandCategory::Pair);
    }

    #[test]
    fn test_last_kicker_decides() {
        let player = [card(Ten, Hearts), card(Ten, Diamonds), card(King, Hearts), card(Seven, Clubs), card(Three, Hearts)];
        let dealer = [card(Ten, Spades), card(Ten, Clubs), card(King, Spades), card(Seven, Spades), card(Four, Diamonds)];
        assert_eq!(resolve(&player, &dealer).unwrap().winner, Winner::Dealer);
    }

    #[test]
    fn test_shared_board_split() {
        // 公共牌是顺子，双方底牌都用不上
        let board = [card(Ten, Clubs), card(Jack, Diamonds), card(Queen, Hearts), card(King, Spades), card(Ace, Clubs)];
        let mut player = vec![card(Two, Spades), card(Three, Hearts)];
        player.extend_from_slice(&board);
        let mut dealer = vec![card(Four, Diamonds), card(Six, Clubs)];
        dealer.extend_from_slice(&board);
        assert_eq!(resolve(&player, &dealer).unwrap().winner, Winner::Tie);
    }

    #[test]
    fn test_full_house_compares_triple_first() {
        let player = [card(Three, Hearts), card(Three, Diamonds), card(Three, Clubs), card(Ace, Hearts), card(Ace, Spades)];
        let dealer = [card(Four, Hearts), card(Four, Diamonds), card(Four, Clubs), card(Two, Hearts), card(Two, Spades)];
        assert_eq!(resolve(&player, &dealer).unwrap().winner, Winner::Dealer);
    }

    #[test]
    fn test_insufficient_pool_fails() {
        let player = [card(Ace, Hearts), card(Ace, Diamonds)];
        let dealer = [card(Ten, Spades), card(Ten, Clubs), card(King, Spades), card(Seven, Spades), card(Four, Diamonds)];
        assert_eq!(resolve(&player, &dealer), Err(PokerError::InsufficientCards { found: 2 }));
        assert_eq!(resolve(&dealer, &player), Err(PokerError::InsufficientCards { found: 2 }));
    }

    #[test]
    fn test_malformed_records_are_rejected_before_evaluation() {
        let record = |suit: Option<&str>, value: Option<&str>| CardRecord {
            suit: suit.map(String::from),
            value: value.map(String::from),
        };
        let dealer = vec![
            record(Some("♠"), Some("10")), record(Some("♣"), Some("10")), record(Some("♠"), Some("K")),
            record(Some("♠"), Some("7")), record(Some("♦"), Some("4")),
        ];
        let mut player = dealer.clone();
        player[2] = record(None, Some("K"));
        assert!(matches!(resolve_records(player, dealer.clone()), Err(PokerError::InvalidCard(_))));

        let mut player = dealer.clone();
        player[4] = record(Some("♥"), Some("B"));
        assert!(matches!(resolve_records(player, dealer.clone()), Err(PokerError::InvalidCard(_))));

        let result = resolve_records(dealer.clone(), dealer).unwrap();
        assert_eq!(result.winner, Winner::Tie);
        assert_eq!(result.player.category, HandCategory::Pair);
    }

    #[test]
    fn test_record_serializes_for_web_layer() {
        let player = [card(Ace, Spades), card(Ace, Diamonds), card(King, Clubs), card(King, Diamonds), card(Two, Hearts)];
        let dealer = [card(Two, Clubs), card(Five, Diamonds), card(Nine, Spades), card(Jack, Hearts), card(King, Spades)];
        let result = resolve(&player, &dealer).unwrap();
        let record = ShowdownRecord::from(&result);
        assert_eq!(record.winner, Winner::Player);
        assert_eq!(record.dealer_category, HandCategory::HighCard);

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["winner"], "Player");
        assert_eq!(json["player_category"], "TwoPair");
        assert_eq!(json["player_best_five"].as_array().unwrap().len(), 5);
    }
}
