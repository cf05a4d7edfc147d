use serde::{Deserialize, Serialize};

/// Format an amount with a currency prefix and exactly two decimals: $1234.56
pub fn currency(val: f64, prefix: &str) -> String {
    if val < 0.0 {
        format!("-{prefix}{:.2}", val.abs())
    } else {
        format!("{prefix}{val:.2}")
    }
}

/// Format a royalty share with no decimals: 25%
pub fn percent(val: f64) -> String {
    format!("{:.0}%", val.round())
}

/// Locale used for month labels produced by the roll-up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    Be,
    En,
}

const MONTHS_BE: [&str; 12] = [
    "Студзень", "Люты", "Сакавік", "Красавік", "Травень", "Чэрвень",
    "Ліпень", "Жнівень", "Верасень", "Кастрычнік", "Лістапад", "Снежань",
];

const MONTHS_EN: [&str; 12] = [
    "January", "February", "March", "April", "May", "June",
    "July", "August", "September", "October", "November", "December",
];

pub fn month_name(locale: Locale, month: u32) -> Option<&'static str> {
    let names = match locale {
        Locale::Be => &MONTHS_BE,
        Locale::En => &MONTHS_EN,
    };
    month
        .checked_sub(1)
        .and_then(|i| names.get(i as usize))
        .copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_currency_formatting() {
        assert_eq!(currency(12.0, "$"), "$12.00");
        assert_eq!(currency(1234.5, "$"), "$1234.50");
        assert_eq!(currency(0.0, "$"), "$0.00");
        assert_eq!(currency(-5.0, "$"), "-$5.00");
        assert_eq!(currency(70.0, "€"), "€70.00");
    }

    #[test]
    fn test_percent_formatting() {
        assert_eq!(percent(25.0), "25%");
        assert_eq!(percent(50.0), "50%");
        assert_eq!(percent(10.4), "10%");
        assert_eq!(percent(12.5), "13%");
    }

    #[test]
    fn test_month_names() {
        assert_eq!(month_name(Locale::Be, 1), Some("Студзень"));
        assert_eq!(month_name(Locale::Be, 11), Some("Лістапад"));
        assert_eq!(month_name(Locale::En, 12), Some("December"));
        assert_eq!(month_name(Locale::En, 0), None);
        assert_eq!(month_name(Locale::En, 13), None);
    }
}
