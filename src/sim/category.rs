//! Contact categories
//!
//! Every body carries a power-of-two category tag. Bodies also carry masks
//! of the categories they bounce off (`collision`) and the categories whose
//! contacts should be reported (`contact_test`).

use std::fmt;
use std::ops::{BitAnd, BitOr, BitOrAssign};

use serde::{Deserialize, Serialize};

/// Category bitmask used purely for contact filtering
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct Category(pub u32);

impl Category {
    pub const NONE: Category = Category(0);
    pub const ALL: Category = Category(u32::MAX);

    pub const BALL: Category = Category(1 << 0);
    pub const FLOOR: Category = Category(1 << 1);
    pub const BLOCK: Category = Category(1 << 2);
    pub const PADDLE: Category = Category(1 << 3);
    pub const BORDER: Category = Category(1 << 4);

    #[inline]
    pub const fn bits(self) -> u32 {
        self.0
    }

    /// True if any bit is shared
    #[inline]
    pub const fn intersects(self, other: Category) -> bool {
        self.0 & other.0 != 0
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl BitOr for Category {
    type Output = Category;

    fn bitor(self, rhs: Self) -> Self::Output {
        Category(self.0 | rhs.0)
    }
}

impl BitOrAssign for Category {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl BitAnd for Category {
    type Output = Category;

    fn bitand(self, rhs: Self) -> Self::Output {
        Category(self.0 & rhs.0)
    }
}

impl fmt::Debug for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match *self {
            Category::NONE => "NONE",
            Category::ALL => "ALL",
            Category::BALL => "BALL",
            Category::FLOOR => "FLOOR",
            Category::BLOCK => "BLOCK",
            Category::PADDLE => "PADDLE",
            Category::BORDER => "BORDER",
            Category(bits) => return write!(f, "Category({bits:#x})"),
        };
        f.write_str(name)
    }
}
