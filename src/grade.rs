use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Fixed-point mark value with two fractional digits, held as hundredths.
///
/// Storage range is 0.00..=999.99 (three integer digits). Values outside that
/// range can still be represented so that writes can be rejected with a
/// constraint error instead of failing to parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Marks(i64);

impl Marks {
    pub const ZERO: Marks = Marks::from_hundredths(0);
    pub const MAX: Marks = Marks::from_hundredths(99_999);

    pub const fn from_hundredths(h: i64) -> Self {
        Marks(h)
    }

    pub const fn whole(n: i64) -> Self {
        Marks(n * 100)
    }

    pub fn hundredths(self) -> i64 {
        self.0
    }

    /// Rounds to two fractional digits, half away from zero, on the shortest
    /// decimal form of `v`. 1.005 is 1.01 even though the nearest f64 lies
    /// just below it.
    pub fn from_f64(v: f64) -> Option<Self> {
        if !v.is_finite() {
            return None;
        }
        // f64 Display never uses exponent notation.
        let text = v.abs().to_string();
        let (int_part, frac_part) = text.split_once('.').unwrap_or((text.as_str(), ""));
        if int_part.len() > 15 {
            return None;
        }
        let whole: i64 = int_part.parse().ok()?;
        let mut digits = frac_part.bytes().map(|b| i64::from(b - b'0'));
        let tenths = digits.next().unwrap_or(0);
        let hundredths = digits.next().unwrap_or(0);
        let carry = i64::from(digits.next().is_some_and(|d| d >= 5));
        let h = whole * 100 + tenths * 10 + hundredths + carry;
        Some(Marks(if v.is_sign_negative() { -h } else { h }))
    }

    pub fn as_f64(self) -> f64 {
        self.0 as f64 / 100.0
    }
}

impl fmt::Display for Marks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let h = self.hundredths();
        let sign = if h < 0 { "-" } else { "" };
        let abs = h.unsigned_abs();
        write!(f, "{}{}.{:02}", sign, abs / 100, abs % 100)
    }
}

impl Serialize for Marks {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.as_f64())
    }
}

impl<'de> Deserialize<'de> for Marks {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let v = f64::deserialize(deserializer)?;
        Marks::from_f64(v).ok_or_else(|| serde::de::Error::custom("marks must be a finite number"))
    }
}

impl ToSql for Marks {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_f64()))
    }
}

impl FromSql for Marks {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        match value {
            ValueRef::Integer(i) => Ok(Marks::whole(i)),
            ValueRef::Real(f) => Marks::from_f64(f).ok_or(FromSqlError::InvalidType),
            _ => Err(FromSqlError::InvalidType),
        }
    }
}

/// Letter grade derived from raw marks obtained. `max_marks` plays no part.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Grade {
    APlus,
    A,
    B,
    C,
    D,
    F,
}

/// Lower bound (inclusive) of each band, highest first. Anything below the
/// last bound is an F.
pub const GRADE_BANDS: [(Marks, Grade); 5] = [
    (Marks::whole(90), Grade::APlus),
    (Marks::whole(80), Grade::A),
    (Marks::whole(70), Grade::B),
    (Marks::whole(60), Grade::C),
    (Marks::whole(50), Grade::D),
];

impl Grade {
    pub fn for_marks(marks: Marks) -> Self {
        GRADE_BANDS
            .iter()
            .find(|(floor, _)| marks >= *floor)
            .map(|(_, grade)| *grade)
            .unwrap_or(Grade::F)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Grade::APlus => "A+",
            Grade::A => "A",
            Grade::B => "B",
            Grade::C => "C",
            Grade::D => "D",
            Grade::F => "F",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "A+" => Some(Grade::APlus),
            "A" => Some(Grade::A),
            "B" => Some(Grade::B),
            "C" => Some(Grade::C),
            "D" => Some(Grade::D),
            "F" => Some(Grade::F),
            _ => None,
        }
    }

    /// SQL expression over `column` that yields the same letter as
    /// [`Grade::for_marks`]. Used for the stored generated column.
    pub fn sql_case(column: &str) -> String {
        let mut sql = String::from("CASE");
        for (floor, grade) in GRADE_BANDS.iter() {
            sql.push_str(&format!(
                " WHEN {} >= {} THEN '{}'",
                column,
                floor,
                grade.as_str()
            ));
        }
        sql.push_str(&format!(" ELSE '{}' END", Grade::F.as_str()));
        sql
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Grade {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl FromSql for Grade {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let s = value.as_str()?;
        Grade::parse(s).ok_or_else(|| FromSqlError::Other(format!("unknown grade {s:?}").into()))
    }
}
