use serde::{Deserialize, Serialize};

/// Coarse priority used to sort handler execution.
///
/// Handlers run in ascending [`Order::value`]; handlers sharing a value keep
/// the order they were registered in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Order {
    Earlier,
    Early,
    #[default]
    Default,
    Late,
    Later,
}

impl Order {
    pub const fn value(self) -> i32 {
        match self {
            Order::Earlier => -100,
            Order::Early => -50,
            Order::Default => 0,
            Order::Late => 50,
            Order::Later => 100,
        }
    }
}

/// Anything that has a stable identifier and a place in an ordered chain.
pub trait Ordered {
    fn identifier(&self) -> &str;

    fn order(&self) -> Order {
        Order::Default
    }
}

/// Stable sort by `order().value()`; ties keep insertion order.
pub fn sort_by_order<T: Ordered + ?Sized, P: std::ops::Deref<Target = T>>(handlers: &mut [P]) {
    handlers.sort_by_key(|handler| handler.order().value());
}
