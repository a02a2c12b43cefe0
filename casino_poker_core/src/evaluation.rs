use crate::card::{rank_value, Card, Face, Suit};
use crate::error::{PokerError, Result};
use serde::{Deserialize, Serialize};
use std::cmp::{Ordering, Reverse};
use std::fmt;
use tracing::debug;

/// 牌型等级 (HandCategory)
/// 变体从弱到强排列，直接利用派生的 `Ord` 比较。
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy, Serialize, Deserialize)]
pub enum HandCategory {
    HighCard,      // 高牌
    Pair,          // 一对
    TwoPair,       // 两对
    ThreeOfKind,   // 三条
    Straight,      // 顺子
    Flush,         // 同花
    FullHouse,     // 葫芦
    FourOfKind,    // 四条
    StraightFlush, // 同花顺
    RoyalFlush,    // 皇家同花顺
}

/// 一次牌型评估的结果
///
/// `best_five` 按比较顺序排列：先是决定牌型的牌，再是按点数从大到小的踢脚牌。
/// A-2-3-4-5 顺子排列为 5-4-3-2-A。
#[derive(Debug, PartialEq, Eq, Clone, Serialize, Deserialize)]
pub struct Evaluation {
    pub category: HandCategory,
    pub best_five: [Card; 5],
}

impl Evaluation {
    /// 用于同牌型比较的点数序列
    pub fn tie_break_values(&self) -> [u8; 5] {
        self.best_five.map(|card| rank_value(card.face))
    }

    /// 先比牌型，再逐张比点数。花色不参与比较。
    pub fn compare(&self, other: &Evaluation) -> Ordering {
        self.category
            .cmp(&other.category)
            .then_with(|| self.tie_break_values().cmp(&other.tie_break_values()))
    }
}

impl fmt::Display for HandCategory {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", match self {
            HandCategory::HighCard => "高牌",
            HandCategory::Pair => "一对",
            HandCategory::TwoPair => "两对",
            HandCategory::ThreeOfKind => "三条",
            HandCategory::Straight => "顺子",
            HandCategory::Flush => "同花",
            HandCategory::FullHouse => "葫芦",
            HandCategory::FourOfKind => "四条",
            HandCategory::StraightFlush => "同花顺",
            HandCategory::RoyalFlush => "皇家同花顺",
        })
    }
}

impl fmt::Display for Evaluation {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} [", self.category)?;
        for (i, card) in self.best_five.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{}", card)?;
        }
        write!(f, "]")
    }
}

// --- 牌型评估逻辑 ---

/// 底牌 + 公共牌合并后评估
pub fn evaluate(hole: &[Card], shared: &[Card]) -> Result<Evaluation> {
    let pool: Vec<Card> = hole.iter().chain(shared).copied().collect();
    classify(&pool)
}

/// 从一组牌（通常 5 到 7 张）中找出能组成的最大牌型及对应的 5 张牌
///
/// 按牌型从强到弱依次尝试，命中即返回。少于 5 张直接报错，不做猜测。
pub fn classify(pool: &[Card]) -> Result<Evaluation> {
    if pool.len() < 5 {
        return Err(PokerError::InsufficientCards { found: pool.len() });
    }

    let mut cards = pool.to_vec();
    // 按点数从大到小排序，之后所有"取最大"的操作都只需取前几张
    cards.sort_by_key(|card| Reverse(rank_value(card.face)));
    let groups: Vec<&[Card]> = cards.chunk_by(|a, b| a.face == b.face).collect();

    let (category, chosen) = straight_flush(&cards)
        .or_else(|| four_of_a_kind(&cards, &groups))
        .or_else(|| full_house(&groups))
        .or_else(|| flush(&cards))
        .or_else(|| find_straight(&cards).map(|run| (HandCategory::Straight, run)))
        .or_else(|| three_of_a_kind(&cards, &groups))
        .or_else(|| two_pair(&cards, &groups))
        .or_else(|| one_pair(&cards, &groups))
        .unwrap_or_else(|| (HandCategory::HighCard, cards[..5].to_vec()));

    let found = chosen.len();
    let best_five: [Card; 5] = chosen
        .try_into()
        .map_err(|_| PokerError::InsufficientCards { found })?;

    let evaluation = Evaluation { category, best_five };
    debug!(%evaluation, pool = pool.len(), "牌型评估完成");
    Ok(evaluation)
}

/// 在按点数降序排好的牌中找最大的顺子，返回从大到小的 5 张牌
///
/// A 既可以当 14 也可以在 A-2-3-4-5 中当 1。
fn find_straight(cards: &[Card]) -> Option<Vec<Card>> {
    (5..=rank_value(Face::Ace)).rev().find_map(|top| {
        (0..5)
            .map(|step| {
                let wanted = match top - step {
                    1 => rank_value(Face::Ace),
                    v => v,
                };
                cards.iter().find(|card| rank_value(card.face) == wanted).copied()
            })
            .collect::<Option<Vec<Card>>>()
    })
}

/// 同一花色的 5 张牌自身构成顺子才算同花顺
fn straight_flush(cards: &[Card]) -> Option<(HandCategory, Vec<Card>)> {
    let run = Suit::ALL
        .iter()
        .filter_map(|&suit| {
            let suited: Vec<Card> = cards.iter().filter(|c| c.suit == suit).copied().collect();
            if suited.len() >= 5 { find_straight(&suited) } else { None }
        })
        .max_by_key(|run| rank_value(run[0].face))?;

    let category = if run[0].face == Face::Ace {
        HandCategory::RoyalFlush
    } else {
        HandCategory::StraightFlush
    };
    Some((category, run))
}

fn four_of_a_kind(cards: &[Card], groups: &[&[Card]]) -> Option<(HandCategory, Vec<Card>)> {
    let quad = groups.iter().find(|g| g.len() >= 4)?;
    let mut chosen = quad[..4].to_vec();
    chosen.extend(kickers(cards, &chosen, 1));
    Some((HandCategory::FourOfKind, chosen))
}

/// 最大的三条 + 剩余最大的对子（可以取自另一组三条）
fn full_house(groups: &[&[Card]]) -> Option<(HandCategory, Vec<Card>)> {
    let trips = groups.iter().find(|g| g.len() >= 3)?;
    let pair = groups
        .iter()
        .find(|g| g[0].face != trips[0].face && g.len() >= 2)?;
    let mut chosen = trips[..3].to_vec();
    chosen.extend_from_slice(&pair[..2]);
    Some((HandCategory::FullHouse, chosen))
}

/// 多个花色都够 5 张时（多副牌才会出现），取前五张点数更大的那一门
fn flush(cards: &[Card]) -> Option<(HandCategory, Vec<Card>)> {
    let best = Suit::ALL
        .iter()
        .map(|&suit| {
            cards
                .iter()
                .filter(|c| c.suit == suit)
                .take(5)
                .copied()
                .collect::<Vec<Card>>()
        })
        .filter(|suited| suited.len() == 5)
        .max_by(|a, b| values(a).cmp(&values(b)))?;
    Some((HandCategory::Flush, best))
}

fn three_of_a_kind(cards: &[Card], groups: &[&[Card]]) -> Option<(HandCategory, Vec<Card>)> {
    let trips = groups.iter().find(|g| g.len() >= 3)?;
    let mut chosen = trips[..3].to_vec();
    chosen.extend(kickers(cards, &chosen, 2));
    Some((HandCategory::ThreeOfKind, chosen))
}

fn two_pair(cards: &[Card], groups: &[&[Card]]) -> Option<(HandCategory, Vec<Card>)> {
    let mut pairs = groups.iter().filter(|g| g.len() >= 2);
    let high = pairs.next()?;
    let low = pairs.next()?;
    let mut chosen = high[..2].to_vec();
    chosen.extend_from_slice(&low[..2]);
    chosen.extend(kickers(cards, &chosen, 1));
    Some((HandCategory::TwoPair, chosen))
}

fn one_pair(cards: &[Card], groups: &[&[Card]]) -> Option<(HandCategory, Vec<Card>)> {
    let pair = groups.iter().find(|g| g.len() >= 2)?;
    let mut chosen = pair[..2].to_vec();
    chosen.extend(kickers(cards, &chosen, 3));
    Some((HandCategory::Pair, chosen))
}

/// 从降序排列的牌中去掉已选的牌（按多重集合去重），取最大的 `count` 张
fn kickers(cards: &[Card], chosen: &[Card], count: usize) -> Vec<Card> {
    let mut taken = chosen.to_vec();
    let mut rest = Vec::with_capacity(count);
    for &card in cards {
        if rest.len() == count {
            break;
        }
        match taken.iter().position(|&c| c == card) {
            Some(pos) => {
                taken.swap_remove(pos);
            }
            None => rest.push(card),
        }
    }
    rest
}

fn values(cards: &[Card]) -> Vec<u8> {
    cards.iter().map(|card| rank_value(card.face)).collect()
}

// --- 单元测试 ---
