//! Keyword/pattern intent router.
//!
//! Routing is a pure function of the query text. Each rule looks for its
//! trigger keywords (Russian or English, case-insensitive) and, when
//! triggered, tries to extract its parameters. Among triggered rules:
//!
//! 1. the rule that extracted the most parameters wins;
//! 2. ties go to the rule declared first in [`RULES`].
//!
//! The winner's outcome is returned as-is, so a query that clearly asks to add
//! a product but carries a malformed price fails with `InvalidParameter`
//! instead of falling through to a less specific rule.

use core::ops::Range;

use once_cell::sync::Lazy;
use regex::Regex;

use shopdesk_products::{Percentage, Price, ProductId};

use crate::error::AgentError;
use crate::intent::Intent;

static ADD_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\bдобав\w*|\badd\b").unwrap());
static DISCOUNT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\bскидк\w*|\bdiscount\w*").unwrap());
static AVERAGE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\baverage\b|\bстатистик\w*|\bstatistics?\b|\bstats\b").unwrap()
});
// "средн" only counts next to a price word ("средняя цена", not "средний рейтинг").
static MEAN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\bсредн\w*").unwrap());
static PRICE_WORD_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)цен\w*").unwrap());
static CATEGORY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:категори\w*|category)\s*[:=]?\s*([^\n,.!?;]*)").unwrap()
});
static LIST_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"(?i)\bвсе\s+(?:продукты|товары)\b|\bсписок\b|\bпокажи\b|\bвыведи\b",
        r"|\blist\b|\bshow\b|\ball\s+products\b",
    ))
    .unwrap()
});
static ID_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(?:\bid\s*[:=#]?\s*|#\s*|№\s*)(\d+)").unwrap());
static PERCENT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(-?\d+(?:[.,]\d+)?)\s*(?:%|процент\w*|percent\b)").unwrap()
});
static DISCOUNT_AMOUNT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(?:скидк\w*|discount\w*)\s*(?:в|на|of|by)?\s*(-?\d+(?:[.,]\d+)?)").unwrap()
});
/// Amounts with digit groups (`75 000`, `1,500`) before plain numbers.
static PRICE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"-?\d{1,3}(?:[ \x{a0}]\d{3})+(?:[.,]\d+)?",
        r"|-?\d{1,3}(?:,\d{3})+(?:\.\d+)?",
        r"|-?\d+(?:[.,]\d+)?",
    ))
    .unwrap()
});
static COMMA_GROUPED_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^-?\d{1,3}(?:,\d{3})+(?:\.\d+)?$").unwrap());
static OUT_OF_STOCK_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\bне\s+в\s+наличии\b|\bнет\s+в\s+наличии\b|\bout\s+of\s+stock\b").unwrap()
});
static NAME_FILLER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(?:(?:новый|новую|новое|новая|продукт|товар|new|product|item)\s+)*").unwrap()
});

/// Outcome of one triggered rule.
struct Candidate {
    extracted: usize,
    outcome: Result<Intent, AgentError>,
}

type Matcher = fn(&str) -> Option<Candidate>;

/// Declaration order doubles as the tie-breaker.
const RULES: &[(&str, Matcher)] = &[
    ("add_product", match_add_product),
    ("compute_discount", match_compute_discount),
    ("discount_price", match_discount_price),
    ("average_price", match_average_price),
    ("list_by_category", match_list_by_category),
    ("list_products", match_list_products),
];

/// Deterministic stand-in for model-driven routing.
#[derive(Debug, Clone, Copy, Default)]
pub struct IntentRouter;

impl IntentRouter {
    pub fn new() -> Self {
        Self
    }

    pub fn route(&self, text: &str) -> Result<Intent, AgentError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(AgentError::EmptyQuery);
        }

        let mut best: Option<(&str, Candidate)> = None;
        for &(name, matcher) in RULES {
            let Some(candidate) = matcher(text) else {
                continue;
            };
            tracing::trace!(rule = name, extracted = candidate.extracted, "rule triggered");
            let better = match &best {
                Some((_, current)) => candidate.extracted > current.extracted,
                None => true,
            };
            if better {
                best = Some((name, candidate));
            }
        }

        match best {
            Some((name, candidate)) => {
                tracing::debug!(rule = name, "rule selected");
                candidate.outcome
            }
            None => Err(AgentError::UnrecognizedIntent),
        }
    }
}

fn match_add_product(text: &str) -> Option<Candidate> {
    let trigger = ADD_RE.find(text)?;

    let (tail, after_colon) = match text.split_once(':') {
        Some((_, tail)) => (tail, true),
        None => (&text[trigger.end()..], false),
    };

    let mut name: Option<String> = None;
    let mut price: Option<Result<Price, AgentError>> = None;
    let mut category: Option<Result<String, AgentError>> = None;

    for part in split_fields(tail).into_iter().map(str::trim).filter(|p| !p.is_empty()) {
        let lowered = part.to_lowercase();
        if lowered.contains("цен") || lowered.contains("price") || lowered.contains("стоим") {
            let mut amounts = PRICE_RE.find_iter(part);
            price = Some(match (amounts.next(), amounts.next()) {
                (Some(m), None) => parse_price(m.as_str()),
                (Some(_), Some(_)) => Err(AgentError::invalid("price", "ambiguous number")),
                (None, _) => Err(AgentError::invalid("price", "not a number")),
            });
        } else if CATEGORY_RE.is_match(part) {
            category = extract_category(part);
        } else if OUT_OF_STOCK_RE.is_match(part)
            || lowered.contains("наличи")
            || lowered.contains("stock")
        {
            continue;
        } else if name.is_none() {
            let candidate = if after_colon {
                part
            } else {
                let filler = NAME_FILLER_RE.find(part).map_or(0, |m| m.end());
                &part[filler..]
            };
            let candidate = strip_quotes(candidate);
            if !candidate.is_empty() {
                name = Some(candidate.to_string());
            }
        }
    }

    let extracted = usize::from(name.is_some())
        + usize::from(matches!(price, Some(Ok(_))))
        + usize::from(matches!(category, Some(Ok(_))));

    let outcome = (|| -> Result<Intent, AgentError> {
        let name = name.ok_or_else(|| AgentError::invalid("name", "missing"))?;
        let price = price.unwrap_or_else(|| Err(AgentError::invalid("price", "missing")))?;
        let category = category.unwrap_or_else(|| Err(AgentError::invalid("category", "missing")))?;
        Ok(Intent::AddProduct {
            name,
            price,
            category,
            in_stock: !OUT_OF_STOCK_RE.is_match(text),
        })
    })();

    Some(Candidate { extracted, outcome })
}

fn match_compute_discount(text: &str) -> Option<Candidate> {
    DISCOUNT_RE.find(text)?;
    let id = ID_RE.captures(text)?;

    let product_id = id[1]
        .parse::<u64>()
        .map(ProductId::new)
        .map_err(|_| AgentError::invalid("product_id", "not a valid identifier"));
    let percentage = extract_percentage(text).map(|(p, _)| p);

    let extracted =
        usize::from(product_id.is_ok()) + usize::from(matches!(percentage, Some(Ok(_))));
    let outcome = (|| -> Result<Intent, AgentError> {
        let product_id = product_id?;
        let percentage =
            percentage.unwrap_or_else(|| Err(AgentError::invalid("percentage", "missing")))?;
        Ok(Intent::ComputeDiscount {
            product_id,
            percentage,
        })
    })();

    Some(Candidate { extracted, outcome })
}

fn match_discount_price(text: &str) -> Option<Candidate> {
    DISCOUNT_RE.find(text)?;
    if ID_RE.is_match(text) {
        return None;
    }

    let percentage = extract_percentage(text);
    let taken = percentage.as_ref().map(|(_, span)| span.clone());
    let price = PRICE_RE
        .find_iter(text)
        .find(|m| taken.as_ref().is_none_or(|span| !overlaps(span, &m.range())))
        .map(|m| parse_price(m.as_str()));

    let extracted = usize::from(matches!(percentage, Some((Ok(_), _))))
        + usize::from(matches!(price, Some(Ok(_))));
    let outcome = (|| -> Result<Intent, AgentError> {
        let percentage = match percentage {
            Some((p, _)) => p?,
            None => return Err(AgentError::invalid("percentage", "missing")),
        };
        let price = price.unwrap_or_else(|| Err(AgentError::invalid("price", "missing")))?;
        Ok(Intent::DiscountPrice { price, percentage })
    })();

    Some(Candidate { extracted, outcome })
}

fn match_average_price(text: &str) -> Option<Candidate> {
    let triggered =
        AVERAGE_RE.is_match(text) || (MEAN_RE.is_match(text) && PRICE_WORD_RE.is_match(text));
    if !triggered {
        return None;
    }
    let category = extract_category(text);

    let extracted = usize::from(matches!(category, Some(Ok(_))));
    let outcome = match category {
        Some(Ok(category)) => Ok(Intent::AveragePrice {
            category: Some(category),
        }),
        Some(Err(e)) => Err(e),
        None => Ok(Intent::AveragePrice { category: None }),
    };

    Some(Candidate { extracted, outcome })
}

fn match_list_by_category(text: &str) -> Option<Candidate> {
    let category = extract_category(text)?;
    let extracted = usize::from(category.is_ok());
    let outcome = category.map(|category| Intent::ListByCategory { category });
    Some(Candidate { extracted, outcome })
}

fn match_list_products(text: &str) -> Option<Candidate> {
    LIST_RE.find(text)?;
    Some(Candidate {
        extracted: 0,
        outcome: Ok(Intent::ListProducts),
    })
}

/// `None` when no category keyword is present; an error when it carries no value.
fn extract_category(text: &str) -> Option<Result<String, AgentError>> {
    let caps = CATEGORY_RE.captures(text)?;
    let value = strip_quotes(caps.get(1).map_or("", |m| m.as_str()));
    if value.is_empty() {
        return Some(Err(AgentError::invalid("category", "cannot be empty")));
    }
    Some(Ok(value.to_string()))
}

/// Explicit `N%` / `N процентов` first, then a number right after the discount keyword.
fn extract_percentage(text: &str) -> Option<(Result<Percentage, AgentError>, Range<usize>)> {
    let caps = PERCENT_RE
        .captures(text)
        .or_else(|| DISCOUNT_AMOUNT_RE.captures(text))?;
    let m = caps.get(1)?;
    let value = match parse_number(m.as_str()) {
        Some(v) => Percentage::new(v).map_err(AgentError::from),
        None => Err(AgentError::invalid("percentage", "not a number")),
    };
    Some((value, m.range()))
}

/// Accepts digit groups separated by spaces or by `,` before exactly three digits.
fn parse_price(raw: &str) -> Result<Price, AgentError> {
    let mut digits: String = raw.chars().filter(|c| !matches!(c, ' ' | '\u{a0}')).collect();
    if COMMA_GROUPED_RE.is_match(&digits) {
        digits.retain(|c| c != ',');
    }
    let value =
        parse_number(&digits).ok_or_else(|| AgentError::invalid("price", "not a number"))?;
    Price::from_major(value).map_err(AgentError::from)
}

fn parse_number(raw: &str) -> Option<f64> {
    raw.replace(',', ".").parse::<f64>().ok()
}

/// Split on `,`/`;`, keeping decimal commas (`1,5`) inside their number.
fn split_fields(s: &str) -> Vec<&str> {
    let bytes = s.as_bytes();
    let mut parts = Vec::new();
    let mut start = 0;
    for (i, c) in s.char_indices() {
        let decimal_comma = c == ','
            && i > 0
            && bytes[i - 1].is_ascii_digit()
            && bytes.get(i + 1).is_some_and(u8::is_ascii_digit);
        if (c == ',' || c == ';') && !decimal_comma {
            parts.push(&s[start..i]);
            start = i + 1;
        }
    }
    parts.push(&s[start..]);
    parts
}

fn strip_quotes(s: &str) -> &str {
    s.trim()
        .trim_matches(|c| matches!(c, '"' | '\'' | '«' | '»' | '“' | '”'))
        .trim()
}

fn overlaps(a: &Range<usize>, b: &Range<usize>) -> bool {
    a.start < b.end && b.start < a.end
}

#[cfg(test)]
mod tests {
    use super::*;

    fn route(text: &str) -> Result<Intent, AgentError> {
        IntentRouter::new().route(text)
    }

    fn price(amount: f64) -> Price {
        Price::from_major(amount).unwrap()
    }

    fn pct(value: f64) -> Percentage {
        Percentage::new(value).unwrap()
    }

    #[test]
    fn empty_and_blank_queries_fail() {
        assert_eq!(route(""), Err(AgentError::EmptyQuery));
        assert_eq!(route("   \n"), Err(AgentError::EmptyQuery));
    }

    #[test]
    fn unrelated_text_is_unrecognized() {
        assert_eq!(route("Какая сегодня погода?"), Err(AgentError::UnrecognizedIntent));
        assert_eq!(route("hello there"), Err(AgentError::UnrecognizedIntent));
    }

    #[test]
    fn list_by_category_in_russian() {
        assert_eq!(
            route("Покажи все продукты в категории Электроника"),
            Ok(Intent::ListByCategory {
                category: "Электроника".to_string()
            })
        );
    }

    #[test]
    fn list_by_category_in_english_strips_punctuation() {
        assert_eq!(
            route("Show products in category Electronics?"),
            Ok(Intent::ListByCategory {
                category: "Electronics".to_string()
            })
        );
    }

    #[test]
    fn list_without_category_lists_everything() {
        assert_eq!(route("Покажи все продукты"), Ok(Intent::ListProducts));
        assert_eq!(route("list"), Ok(Intent::ListProducts));
    }

    #[test]
    fn add_product_extracts_all_fields() {
        assert_eq!(
            route("Добавь новый продукт: Мышка, цена 1500, категория Электроника"),
            Ok(Intent::AddProduct {
                name: "Мышка".to_string(),
                price: price(1500.0),
                category: "Электроника".to_string(),
                in_stock: true,
            })
        );
    }

    #[test]
    fn add_product_without_colon_drops_filler_words() {
        assert_eq!(
            route("Add new product Keyboard, price 49.90, category Electronics"),
            Ok(Intent::AddProduct {
                name: "Keyboard".to_string(),
                price: price(49.9),
                category: "Electronics".to_string(),
                in_stock: true,
            })
        );
    }

    #[test]
    fn add_product_honours_out_of_stock_marker() {
        let intent =
            route("Добавь товар: «Ручка», цена 1,5, категория Канцтовары, нет в наличии").unwrap();
        assert_eq!(
            intent,
            Intent::AddProduct {
                name: "Ручка".to_string(),
                price: price(1.5),
                category: "Канцтовары".to_string(),
                in_stock: false,
            }
        );
    }

    #[test]
    fn add_product_with_malformed_price_is_invalid_not_rerouted() {
        // The category rule also triggers here, but add extracted more.
        assert_eq!(
            route("Добавь продукт: Мышка, цена бесплатно, категория Электроника"),
            Err(AgentError::invalid("price", "not a number"))
        );
    }

    #[test]
    fn add_product_with_negative_price_is_invalid() {
        assert_eq!(
            route("Добавь продукт: Мышка, цена -5, категория Электроника"),
            Err(AgentError::invalid("price", "must be non-negative"))
        );
    }

    #[test]
    fn add_product_requires_every_field() {
        assert_eq!(
            route("Добавь продукт: Мышка, цена 10"),
            Err(AgentError::invalid("category", "missing"))
        );
        assert_eq!(route("Добавь"), Err(AgentError::invalid("name", "missing")));
    }

    #[test]
    fn compute_discount_with_id_and_percent() {
        assert_eq!(
            route("Посчитай скидку 15% на продукт id 3"),
            Ok(Intent::ComputeDiscount {
                product_id: ProductId::new(3),
                percentage: pct(15.0),
            })
        );
        assert_eq!(
            route("discount of 20 percent for #7"),
            Ok(Intent::ComputeDiscount {
                product_id: ProductId::new(7),
                percentage: pct(20.0),
            })
        );
    }

    #[test]
    fn compute_discount_percentage_out_of_range() {
        assert_eq!(
            route("Скидка 150% на товар id 2"),
            Err(AgentError::invalid("percentage", "must be within [0, 100]"))
        );
    }

    #[test]
    fn compute_discount_missing_percentage() {
        assert_eq!(
            route("Какая скидка на товар id 2?"),
            Err(AgentError::invalid("percentage", "missing"))
        );
    }

    #[test]
    fn discount_on_quoted_price() {
        assert_eq!(
            route("Рассчитай скидку 10% на 2000"),
            Ok(Intent::DiscountPrice {
                price: price(2000.0),
                percentage: pct(10.0),
            })
        );
        assert_eq!(
            route("скидка 25 на 400"),
            Ok(Intent::DiscountPrice {
                price: price(400.0),
                percentage: pct(25.0),
            })
        );
    }

    #[test]
    fn average_price_overall_and_filtered() {
        assert_eq!(
            route("Какая средняя цена товаров?"),
            Ok(Intent::AveragePrice { category: None })
        );
        // Average and category-list both extract one parameter; average is declared first.
        assert_eq!(
            route("Средняя цена в категории Электроника"),
            Ok(Intent::AveragePrice {
                category: Some("Электроника".to_string())
            })
        );
        assert_eq!(route("statistics"), Ok(Intent::AveragePrice { category: None }));
    }

    #[test]
    fn mean_without_price_word_is_not_an_average() {
        assert_eq!(
            route("Покажи средний рейтинг в категории Электроника"),
            Ok(Intent::ListByCategory {
                category: "Электроника".to_string()
            })
        );
    }

    #[test]
    fn add_product_accepts_grouped_prices() {
        assert_eq!(
            route("Добавь новый продукт: Ноутбук, цена 75 000, категория Электроника"),
            Ok(Intent::AddProduct {
                name: "Ноутбук".to_string(),
                price: price(75_000.0),
                category: "Электроника".to_string(),
                in_stock: true,
            })
        );
        assert_eq!(
            route("Add product: Laptop, price 1,500, category Electronics"),
            Ok(Intent::AddProduct {
                name: "Laptop".to_string(),
                price: price(1500.0),
                category: "Electronics".to_string(),
                in_stock: true,
            })
        );
    }

    #[test]
    fn add_product_with_two_numbers_in_price_is_ambiguous() {
        assert_eq!(
            route("Добавь продукт: Мышка, цена 12 50, категория Электроника"),
            Err(AgentError::invalid("price", "ambiguous number"))
        );
    }

    #[test]
    fn discount_on_grouped_price() {
        assert_eq!(
            route("Рассчитай скидку 10% на 1 500"),
            Ok(Intent::DiscountPrice {
                price: price(1500.0),
                percentage: pct(10.0),
            })
        );
    }

    #[test]
    fn category_keyword_without_value_is_invalid() {
        assert_eq!(
            route("Покажи категорию"),
            Err(AgentError::invalid("category", "cannot be empty"))
        );
    }

    #[test]
    fn routing_is_case_insensitive() {
        assert_eq!(
            route("ПОКАЖИ ВСЕ ПРОДУКТЫ В КАТЕГОРИИ Электроника"),
            Ok(Intent::ListByCategory {
                category: "Электроника".to_string()
            })
        );
    }
}
