use crate::error::PokerError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// --- 核心数据结构定义 ---

/// 花色 (Suit)
/// 花色不参与任何大小比较，只用于判断同花。
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy, Serialize, Deserialize)]
pub enum Suit {
    Hearts,   // 红心 ♥️
    Diamonds, // 方块 ♦️
    Clubs,    // 梅花 ♣️
    Spades,   // 黑桃 ♠️
}

impl Suit {
    pub const ALL: [Suit; 4] = [Suit::Hearts, Suit::Diamonds, Suit::Clubs, Suit::Spades];
}

/// 点数 (Face)
/// 只接受 13 种标准点数。数值大小统一通过 [`rank_value`] 取得。
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy, Serialize, Deserialize)]
pub enum Face {
    Two,
    Three,
    Four,
    Five,
    Six,
    Seven,
    Eight,
    Nine,
    Ten,
    Jack,
    Queen,
    King,
    Ace,
}

impl Face {
    pub const ALL: [Face; 13] = [
        Face::Two, Face::Three, Face::Four, Face::Five, Face::Six, Face::Seven,
        Face::Eight, Face::Nine, Face::Ten, Face::Jack, Face::Queen, Face::King, Face::Ace,
    ];
}

/// 点数 -> 数值：2..10 为其本身，J=11, Q=12, K=13, A=14。
///
/// 这是整个引擎唯一的点数换算入口，顺子判断、踢脚牌比较、高牌比较都必须走这里。
pub fn rank_value(face: Face) -> u8 {
    match face {
        Face::Two => 2,
        Face::Three => 3,
        Face::Four => 4,
        Face::Five => 5,
        Face::Six => 6,
        Face::Seven => 7,
        Face::Eight => 8,
        Face::Nine => 9,
        Face::Ten => 10,
        Face::Jack => 11,
        Face::Queen => 12,
        Face::King => 13,
        Face::Ace => 14,
    }
}

/// 单张扑克牌 (Card)
/// 构造即合法：花色与点数都是封闭枚举，不存在"缺花色"的牌。
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy, Serialize, Deserialize)]
pub struct Card {
    pub suit: Suit,
    pub face: Face,
}

impl Card {
    pub fn new(face: Face, suit: Suit) -> Card {
        Card { suit, face }
    }
}

/// Web 层传来的松散牌数据，字段可能缺失。
///
/// 必须先通过 `Card::try_from` 校验，再交给评估逻辑。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardRecord {
    pub suit: Option<String>,
    pub value: Option<String>,
}

impl TryFrom<CardRecord> for Card {
    type Error = PokerError;

    fn try_from(record: CardRecord) -> Result<Self, Self::Error> {
        let suit = record
            .suit
            .as_deref()
            .ok_or_else(|| PokerError::InvalidCard("缺少花色".to_string()))?
            .parse::<Suit>()?;
        let face = record
            .value
            .as_deref()
            .ok_or_else(|| PokerError::InvalidCard("缺少点数".to_string()))?
            .parse::<Face>()?;
        Ok(Card { suit, face })
    }
}

/// 批量校验，遇到第一张无效牌即返回错误
pub fn cards_from_records(records: Vec<CardRecord>) -> Result<Vec<Card>, PokerError> {
    records.into_iter().map(Card::try_from).collect()
}

// --- 文本解析 ---

/// emoji 花色后面常跟一个变体选择符
const VARIATION_SELECTOR: char = '\u{FE0F}';

impl FromStr for Suit {
    type Err = PokerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().trim_end_matches(VARIATION_SELECTOR);
        match s.to_ascii_lowercase().as_str() {
            "♥" | "h" | "heart" | "hearts" => Ok(Suit::Hearts),
            "♦" | "d" | "diamond" | "diamonds" => Ok(Suit::Diamonds),
            "♣" | "c" | "club" | "clubs" => Ok(Suit::Clubs),
            "♠" | "s" | "spade" | "spades" => Ok(Suit::Spades),
            _ => Err(PokerError::InvalidCard(format!("未知花色 '{}'", s))),
        }
    }
}

impl FromStr for Face {
    type Err = PokerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        match s.to_ascii_uppercase().as_str() {
            "2" => Ok(Face::Two),
            "3" => Ok(Face::Three),
            "4" => Ok(Face::Four),
            "5" => Ok(Face::Five),
            "6" => Ok(Face::Six),
            "7" => Ok(Face::Seven),
            "8" => Ok(Face::Eight),
            "9" => Ok(Face::Nine),
            "10" | "T" => Ok(Face::Ten),
            "J" => Ok(Face::Jack),
            "Q" => Ok(Face::Queen),
            "K" => Ok(Face::King),
            "A" => Ok(Face::Ace),
            _ => Err(PokerError::InvalidCard(format!("未知点数 '{}'", s))),
        }
    }
}

/// 解析 "10♥"、"A♠️"、"Ts" 这类写法：最后一个字符是花色，其余是点数。
impl FromStr for Card {
    type Err = PokerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().trim_end_matches(VARIATION_SELECTOR);
        let mut chars = s.chars();
        let suit_char = chars
            .next_back()
            .ok_or_else(|| PokerError::InvalidCard("空字符串".to_string()))?;
        let face_part = chars.as_str();
        if face_part.is_empty() {
            return Err(PokerError::InvalidCard(format!("缺少点数 '{}'", s)));
        }
        let suit = suit_char.to_string().parse::<Suit>()?;
        let face = face_part.parse::<Face>()?;
        Ok(Card { suit, face })
    }
}

// --- 实现辅助功能 ---

impl fmt::Display for Suit {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", match self {
            Suit::Hearts => "♥",
            Suit::Diamonds => "♦",
            Suit::Clubs => "♣",
            Suit::Spades => "♠",
        })
    }
}

impl fmt::Display for Face {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", match self {
            Face::Two => "2",
            Face::Three => "3",
            Face::Four => "4",
            Face::Five => "5",
            Face::Six => "6",
            Face::Seven => "7",
            Face::Eight => "8",
            Face::Nine => "9",
            Face::Ten => "10",
            Face::Jack => "J",
            Face::Queen => "Q",
            Face::King => "K",
            Face::Ace => "A",
        })
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}{}", self.face, self.suit)
    }
}

// --- 单元测试 ---
