use crate::card::{Card, Face, Suit};
use crate::error::{PokerError, Result};
use rand::Rng;
use tracing::debug;

/// 一副标准牌的张数
pub const STANDARD_DECK_SIZE: usize = 52;

/// 牌堆 (Deck)
///
/// 由一副或多副 52 张的标准牌拼接而成，`draw` 从末尾（牌顶）取牌。
/// 每局使用一个新牌堆，不跨局复用。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deck {
    cards: Vec<Card>,
}

impl Deck {
    /// 未洗的牌靴：`deck_count` 副牌按 花色 × 点数 的顺序拼接
    pub fn ordered(deck_count: usize) -> Result<Deck> {
        if deck_count == 0 {
            return Err(PokerError::InvalidArgument("牌副数必须为正数".to_string()));
        }
        let mut cards = Vec::with_capacity(STANDARD_DECK_SIZE * deck_count);
        for _ in 0..deck_count {
            for suit in Suit::ALL {
                for face in Face::ALL {
                    cards.push(Card::new(face, suit));
                }
            }
        }
        Ok(Deck { cards })
    }

    /// 用注入的随机源创建并洗好 `deck_count` 副牌
    pub fn with_rng<R: Rng + ?Sized>(deck_count: usize, rng: &mut R) -> Result<Deck> {
        let mut deck = Deck::ordered(deck_count)?;
        deck.shuffle(rng);
        debug!(deck_count, cards = deck.remaining(), "新牌堆已洗好");
        Ok(deck)
    }

    /// 直接用给定的牌序构造牌堆，最后一张是牌顶
    pub fn from_cards(cards: Vec<Card>) -> Deck {
        Deck { cards }
    }

    pub fn shuffle<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        shuffle(&mut self.cards, rng);
    }

    /// 取出并返回牌顶的一张牌
    pub fn draw(&mut self) -> Result<Card> {
        let card = self.cards.pop().ok_or(PokerError::EmptyDeck)?;
        debug!(%card, remaining = self.cards.len(), "抽牌");
        Ok(card)
    }

    /// 一次取出 `count` 张牌。剩余不足时一张都不取。
    pub fn draw_many(&mut self, count: usize) -> Result<Vec<Card>> {
        if self.cards.len() < count {
            return Err(PokerError::EmptyDeck);
        }
        (0..count).map(|_| self.draw()).collect()
    }

    /// 烧掉牌顶一张牌
    pub fn burn(&mut self) -> Result<()> {
        let card = self.cards.pop().ok_or(PokerError::EmptyDeck)?;
        debug!(%card, "烧牌");
        Ok(())
    }

    pub fn remaining(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }
}

/// 创建 `deck_count` 副牌并用线程随机数洗牌
pub fn create_deck(deck_count: usize) -> Result<Deck> {
    Deck::with_rng(deck_count, &mut rand::rng())
}

/// Fisher–Yates 洗牌：从最后一个位置往前，与 `0..=i` 中均匀选出的位置交换
pub fn shuffle<T, R: Rng + ?Sized>(items: &mut [T], rng: &mut R) {
    for i in (1..items.len()).rev() {
        let j = rng.random_range(0..=i);
        items.swap(i, j);
    }
}

// --- 单元测试 ---

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::collections::HashMap;

    fn counts(cards: &[Card]) -> HashMap<Card, usize> {
        let mut counts = HashMap::new();
        for &card in cards {
            *counts.entry(card).or_insert(0) += 1;
        }
        counts
    }

    #[test]
    fn test_single_deck_has_52_distinct_cards() {
        let deck = create_deck(1).unwrap();
        assert_eq!(deck.remaining(), 52);
        let counts = counts(deck.cards());
        assert_eq!(counts.len(), 52);
        assert!(counts.values().all(|&c| c == 1));
    }

    #[test]
    fn test_shoe_contains_each_card_n_times() {
        for n in 1..=6 {
            let deck = create_deck(n).unwrap();
            assert_eq!(deck.remaining(), 52 * n);
            let counts = counts(deck.cards());
            assert_eq!(counts.len(), 52);
            assert!(counts.values().all(|&c| c == n), "{} 副牌时计数错误", n);
        }
    }

    #[test]
    fn test_zero_decks_is_invalid() {
        assert!(matches!(create_deck(0), Err(PokerError::InvalidArgument(_))));
        assert!(matches!(Deck::ordered(0), Err(PokerError::InvalidArgument(_))));
    }

    #[test]
    fn test_shuffle_is_a_permutation() {
        let ordered = Deck::ordered(2).unwrap();
        let mut shuffled = ordered.clone();
        shuffled.shuffle(&mut StdRng::seed_from_u64(7));
        assert_eq!(counts(ordered.cards()), counts(shuffled.cards()));
        assert_ne!(ordered.cards(), shuffled.cards());
    }

    #[test]
    fn test_seeded_shuffle_is_reproducible() {
        let a = Deck::with_rng(1, &mut StdRng::seed_from_u64(42)).unwrap();
        let b = Deck::with_rng(1, &mut StdRng::seed_from_u64(42)).unwrap();
        let c = Deck::with_rng(1, &mut StdRng::seed_from_u64(43)).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    // 永远输出 0 的随机源：每一步都选中下标 0
    struct ZeroRng;

    impl rand::RngCore for ZeroRng {
        fn next_u32(&mut self) -> u32 {
            0
        }

        fn next_u64(&mut self) -> u64 {
            0
        }

        fn fill_bytes(&mut self, dest: &mut [u8]) {
            dest.fill(0);
        }
    }

    #[test]
    fn test_fixed_source_gives_exact_order() {
        // i=4..1 依次与下标 0 交换
        let mut items = [0, 1, 2, 3, 4];
        shuffle(&mut items, &mut ZeroRng);
        assert_eq!(items, [1, 2, 3, 4, 0]);

        // 整副牌同理：整体左移一位，原来的第一张落到牌顶
        let ordered = Deck::ordered(1).unwrap();
        let mut deck = ordered.clone();
        deck.shuffle(&mut ZeroRng);
        assert_eq!(&deck.cards()[..STANDARD_DECK_SIZE - 1], &ordered.cards()[1..]);
        assert_eq!(deck.cards()[STANDARD_DECK_SIZE - 1], ordered.cards()[0]);
    }

    #[test]
    fn test_shuffle_handles_tiny_slices() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut empty: Vec<Card> = vec![];
        shuffle(&mut empty, &mut rng);
        assert!(empty.is_empty());

        let one = Card::new(Face::Ace, Suit::Spades);
        let mut single = vec![one];
        shuffle(&mut single, &mut rng);
        assert_eq!(single, vec![one]);
    }

    #[test]
    fn test_draw_takes_from_top() {
        let bottom = Card::new(Face::Two, Suit::Clubs);
        let top = Card::new(Face::King, Suit::Hearts);
        let mut deck = Deck::from_cards(vec![bottom, top]);
        assert_eq!(deck.draw().unwrap(), top);
        assert_eq!(deck.draw().unwrap(), bottom);
        assert!(deck.is_empty());
        assert_eq!(deck.draw(), Err(PokerError::EmptyDeck));
        // 再次抽仍然报错，而不是返回哨兵值
        assert_eq!(deck.draw(), Err(PokerError::EmptyDeck));
    }

    #[test]
    fn test_draw_many_is_all_or_nothing() {
        let mut deck = Deck::ordered(1).unwrap();
        let hand = deck.draw_many(50).unwrap();
        assert_eq!(hand.len(), 50);
        assert_eq!(deck.remaining(), 2);

        assert_eq!(deck.draw_many(3), Err(PokerError::EmptyDeck));
        assert_eq!(deck.remaining(), 2);
    }

    #[test]
    fn test_burn() {
        let mut deck = Deck::ordered(1).unwrap();
        deck.burn().unwrap();
        assert_eq!(deck.remaining(), 51);
        let mut empty = Deck::from_cards(vec![]);
        assert_eq!(empty.burn(), Err(PokerError::EmptyDeck));
    }
}
