//! 距离类型
//!
//! 内部使用显式的 `Unreachable` 变体表示"无穷远"，只在进程内比较时转换为 `f64::INFINITY`。
//! 跨越文本序列化边界时，非有限值编码为字符串哨兵（`"inf"`、`"-inf"`、`"NaN"`），
//! 绝不会静默变成 `null` 或 `0`。

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;

/// 正无穷的序列化哨兵
pub const INFINITY_SENTINEL: &str = "inf";
/// 负无穷的序列化哨兵
pub const NEG_INFINITY_SENTINEL: &str = "-inf";
/// NaN 的序列化哨兵
pub const NAN_SENTINEL: &str = "NaN";

/// 从起点出发的最短已知代价
#[derive(Debug, Clone, Copy, Default)]
pub enum Distance {
    Finite(f64),
    #[default]
    Unreachable,
}

impl Distance {
    pub const ZERO: Distance = Distance::Finite(0.0);

    /// 把 `f64` 规范化为距离：`+∞` 视为不可达
    pub fn from_f64(value: f64) -> Self {
        if value == f64::INFINITY {
            Distance::Unreachable
        } else {
            Distance::Finite(value)
        }
    }

    /// 用于进程内比较的数值
    pub fn value(&self) -> f64 {
        match self {
            Distance::Finite(v) => *v,
            Distance::Unreachable => f64::INFINITY,
        }
    }

    pub fn is_finite(&self) -> bool {
        matches!(self, Distance::Finite(v) if v.is_finite())
    }

    pub fn is_unreachable(&self) -> bool {
        !self.is_finite()
    }

    /// 沿一条边扩展距离；不可达加任何权重仍然不可达
    pub fn extend(&self, weight: f64) -> Distance {
        match self {
            Distance::Finite(v) => Distance::from_f64(v + weight),
            Distance::Unreachable => Distance::Unreachable,
        }
    }

    /// 严格小于
    pub fn improves_on(&self, other: &Distance) -> bool {
        self.value() < other.value()
    }
}

impl PartialEq for Distance {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Distance::Unreachable, Distance::Unreachable) => true,
            (Distance::Finite(a), Distance::Finite(b)) => a == b || (a.is_nan() && b.is_nan()),
            (Distance::Unreachable, Distance::Finite(v))
            | (Distance::Finite(v), Distance::Unreachable) => *v == f64::INFINITY,
        }
    }
}

impl PartialOrd for Distance {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.value().partial_cmp(&other.value())
    }
}

impl From<f64> for Distance {
    fn from(value: f64) -> Self {
        Distance::from_f64(value)
    }
}

impl fmt::Display for Distance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Distance::Unreachable => write!(f, "{}", INFINITY_SENTINEL),
            Distance::Finite(v) if v.is_nan() => write!(f, "{}", NAN_SENTINEL),
            Distance::Finite(v) if v.is_infinite() => {
                let sentinel = if *v > 0.0 {
                    INFINITY_SENTINEL
                } else {
                    NEG_INFINITY_SENTINEL
                };
                write!(f, "{}", sentinel)
            }
            // 整数值按整数显示：11 而不是 11.0
            Distance::Finite(v) if v.fract() == 0.0 && v.abs() < 1e15 => {
                write!(f, "{}", *v as i64)
            }
            Distance::Finite(v) => write!(f, "{}", v),
        }
    }
}

impl Serialize for Distance {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Distance::Finite(v) if v.is_finite() => serializer.serialize_f64(*v),
            other => serializer.serialize_str(&other.to_string()),
        }
    }
}

struct DistanceVisitor;

impl<'de> Visitor<'de> for DistanceVisitor {
    type Value = Distance;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "a number or one of \"{}\", \"{}\", \"{}\"",
            INFINITY_SENTINEL, NEG_INFINITY_SENTINEL, NAN_SENTINEL
        )
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Distance, E> {
        Ok(Distance::from_f64(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Distance, E> {
        Ok(Distance::Finite(v as f64))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Distance, E> {
        Ok(Distance::Finite(v as f64))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Distance, E> {
        match v {
            INFINITY_SENTINEL | "∞" => Ok(Distance::Unreachable),
            NEG_INFINITY_SENTINEL => Ok(Distance::Finite(f64::NEG_INFINITY)),
            NAN_SENTINEL => Ok(Distance::Finite(f64::NAN)),
            other => Err(E::invalid_value(de::Unexpected::Str(other), &self)),
        }
    }
}

impl<'de> Deserialize<'de> for Distance {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(DistanceVisitor)
    }
}
