use holdem_advisor::cards::{parse_cards, Card};
use holdem_advisor::evaluator::{evaluate_five, Category, HandRank, HandRanker, StandardRanker};

fn five(s: &str) -> [Card; 5] {
    let cards = parse_cards(s).unwrap();
    [cards[0], cards[1], cards[2], cards[3], cards[4]]
}

/// Strongest and weakest example of every category with their ranks.
const EXTREMES: [(&str, &str, u16, Category); 18] = [
    ("As Ks Qs Js Ts", "Royal Flush", 1, Category::StraightFlush),
    ("5h 4h 3h 2h Ah", "Straight Flush", 10, Category::StraightFlush),
    ("Ac Ad Ah As Kc", "Four of a Kind", 11, Category::FourOfAKind),
    ("2c 2d 2h 2s 3c", "Four of a Kind", 166, Category::FourOfAKind),
    ("Ac Ad Ah Kc Kd", "Full House", 167, Category::FullHouse),
    ("2c 2d 2h 3c 3d", "Full House", 322, Category::FullHouse),
    ("Ah Kh Qh Jh 9h", "Flush", 323, Category::Flush),
    ("7d 5d 4d 3d 2d", "Flush", 1599, Category::Flush),
    ("Ac Kd Qh Js Tc", "Straight", 1600, Category::Straight),
    ("5c 4d 3h 2s Ac", "Straight", 1609, Category::Straight),
    ("Ac Ad Ah Kc Qd", "Three of a Kind", 1610, Category::ThreeOfAKind),
    ("2c 2d 2h 4c 3d", "Three of a Kind", 2467, Category::ThreeOfAKind),
    ("Ac Ad Kh Kc Qd", "Two Pair", 2468, Category::TwoPair),
    ("3c 3d 2h 2c 4d", "Two Pair", 3325, Category::TwoPair),
    ("Ac Ad Kh Qc Jd", "One Pair", 3326, Category::Pair),
    ("2c 2d 5h 4c 3d", "One Pair", 6185, Category::Pair),
    ("Ac Kd Qh Jc 9d", "High Card", 6186, Category::HighCard),
    ("7c 5d 4h 3c 2d", "High Card", 7462, Category::HighCard),
];

#[test]
fn category_extremes_have_known_ranks() {
    for (cards, label, rank, category) in EXTREMES {
        let hand = five(cards);
        let r = StandardRanker.rank(&hand);
        assert_eq!(r, HandRank::new(rank), "{cards}");
        assert_eq!(r.category(), category, "{cards}");
        assert_eq!(r.label(), label, "{cards}");
        assert_eq!(evaluate_five(&hand).category, category, "{cards}");
    }
}

#[test]
fn kickers_separate_equal_categories() {
    let better = StandardRanker.rank(&five("Kc Kd 9h 7c 3d"));
    let worse = StandardRanker.rank(&five("Kh Ks 9c 7d 2h"));
    assert!(better < worse);
    assert_eq!(better.category(), Category::Pair);
}

#[test]
fn suits_do_not_matter_outside_flushes() {
    let a = StandardRanker.rank(&five("Qc Qd 8h 8c 4d"));
    let b = StandardRanker.rank(&five("Qh Qs 8d 8s 4c"));
    assert_eq!(a, b);
}
