use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Inclusive numeric range offered as one filter option.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bucket {
    pub label: &'static str,
    pub min: Decimal,
    pub max: Decimal,
}

impl Bucket {
    pub fn contains(&self, value: Decimal) -> bool {
        value >= self.min && value <= self.max
    }
}

/// Rating option: "N stars and up".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RatingBucket {
    pub label: &'static str,
    pub min: i64,
}

pub const PRICE_BUCKETS: [Bucket; 5] = [
    Bucket {
        label: "Under $200",
        min: dec!(0),
        max: dec!(200),
    },
    Bucket {
        label: "$200 - $500",
        min: dec!(200),
        max: dec!(500),
    },
    Bucket {
        label: "$500 - $1,000",
        min: dec!(500),
        max: dec!(1000),
    },
    Bucket {
        label: "$1,000 - $5,000",
        min: dec!(1000),
        max: dec!(5000),
    },
    Bucket {
        label: "Over $5,000",
        min: dec!(5000),
        max: Decimal::MAX,
    },
];

pub const DISCOUNT_BUCKETS: [Bucket; 5] = [
    Bucket {
        label: "Up to 10%",
        min: dec!(0),
        max: dec!(10),
    },
    Bucket {
        label: "10% - 25%",
        min: dec!(10),
        max: dec!(25),
    },
    Bucket {
        label: "25% - 50%",
        min: dec!(25),
        max: dec!(50),
    },
    Bucket {
        label: "50% - 75%",
        min: dec!(50),
        max: dec!(75),
    },
    Bucket {
        label: "75% and more",
        min: dec!(75),
        max: dec!(100),
    },
];

pub const RATING_BUCKETS: [RatingBucket; 4] = [
    RatingBucket {
        label: "4 stars & up",
        min: 4,
    },
    RatingBucket {
        label: "3 stars & up",
        min: 3,
    },
    RatingBucket {
        label: "2 stars & up",
        min: 2,
    },
    RatingBucket {
        label: "1 star & up",
        min: 1,
    },
];
