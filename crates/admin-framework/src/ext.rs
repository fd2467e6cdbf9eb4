//! Extension traits for slices and dates.

use chrono::NaiveDateTime;

pub trait SliceExt<T> {
    fn first_or_none(&self) -> Option<&T>;
    fn last_or_none(&self) -> Option<&T>;
    /// True when the slice has at least one element.
    fn exists(&self) -> bool;
    /// Elements also present in `other`, in this slice's order.
    fn intersect(&self, other: &[T]) -> Vec<T>
    where
        T: PartialEq + Clone;
}

impl<T> SliceExt<T> for [T] {
    fn first_or_none(&self) -> Option<&T> {
        self.first()
    }

    fn last_or_none(&self) -> Option<&T> {
        self.last()
    }

    fn exists(&self) -> bool {
        !self.is_empty()
    }

    fn intersect(&self, other: &[T]) -> Vec<T>
    where
        T: PartialEq + Clone,
    {
        self.iter().filter(|x| other.contains(x)).cloned().collect()
    }
}

pub trait DateExt {
    /// `YYYY-MM-DD`
    fn to_ymd(&self) -> String;
    /// `YYYY-MM-DD HH:MM:SS`
    fn to_sql(&self) -> String;
}

impl DateExt for NaiveDateTime {
    fn to_ymd(&self) -> String {
        self.format("%Y-%m-%d").to_string()
    }

    fn to_sql(&self) -> String {
        self.format("%Y-%m-%d %H:%M:%S").to_string()
    }
}
