//! Color identity resolution: free-form text to a validated color code,
//! color code to a search query, raw search results to display records.

use crate::domain::model::{
    Color, ColorCode, ColorIdentityQuery, CommanderRecord, DetailLink, ScryfallCard,
};
use crate::utils::error::IdentityError;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use regex::Regex;
use std::sync::LazyLock;

pub const MAX_COLORS: usize = 5;

/// Probability of each color-set size for random identities.
pub const SIZE_WEIGHTS: [(usize, f64); MAX_COLORS] =
    [(1, 0.20), (2, 0.30), (3, 0.30), (4, 0.10), (5, 0.10)];

static NON_LETTERS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-z]").expect("static pattern"));
static COLOR_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[WUBRG]+$").expect("static pattern"));

/// Turns text like `"blue-black"`, `"u b"` or `"UB"` into a color code.
///
/// Color names map to their symbol; every other word is upper-cased and
/// kept, so stray words surface as `InvalidColorCode`. Repeated colors are
/// not collapsed: `"WW"` is accepted.
pub fn normalize(raw_text: &str) -> Result<ColorCode, IdentityError> {
    let lowered = raw_text.to_lowercase();
    let spaced = NON_LETTERS.replace_all(&lowered, " ");

    let candidate: String = spaced
        .split_whitespace()
        .map(|token| match Color::from_name(token) {
            Some(color) => color.symbol().to_string(),
            None => token.to_uppercase(),
        })
        .collect();

    if candidate.is_empty() {
        return Err(IdentityError::EmptyIdentity);
    }

    let length = candidate.chars().count();
    if length > MAX_COLORS {
        return Err(IdentityError::TooManyColors { candidate, length });
    }

    if !COLOR_CODE.is_match(&candidate) {
        return Err(IdentityError::InvalidColorCode { candidate });
    }

    Ok(ColorCode::new_unchecked(candidate))
}

/// Commanders whose identity is exactly `code` and that are legal in the
/// Commander format.
pub fn build_search_query(code: &ColorCode) -> ColorIdentityQuery {
    ColorIdentityQuery::new(format!(
        "identity={} is:commander legal:commander",
        code.as_str()
    ))
}

/// Exact-name lookup restricted to commanders.
pub fn build_name_query(name: &str) -> ColorIdentityQuery {
    let cleaned = name.replace('"', "");
    ColorIdentityQuery::new(format!("!\"{}\" is:commander", cleaned.trim()))
}

/// Random identity using the process-wide generator.
pub fn random_color_identity() -> ColorCode {
    generate_random_color_identity(&mut rand::rng())
}

/// Fixed seed for reproducible runs, OS entropy otherwise.
pub fn seeded_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    }
}

/// Picks a size from [`SIZE_WEIGHTS`], then that many distinct colors.
/// Symbols are emitted in WUBRG order.
pub fn generate_random_color_identity<R: Rng>(rng: &mut R) -> ColorCode {
    let size = size_for_draw(rng.random::<f64>());

    let mut colors = Color::ALL;
    colors.shuffle(rng);

    let mut chosen = colors[..size].to_vec();
    chosen.sort();

    ColorCode::new_unchecked(chosen.into_iter().map(Color::symbol).collect())
}

fn size_for_draw(r: f64) -> usize {
    let mut cumulative = 0.0;
    for (size, weight) in SIZE_WEIGHTS {
        cumulative += weight;
        if cumulative > r {
            return size;
        }
    }
    // float rounding can leave the total a hair under 1.0
    MAX_COLORS
}

/// Maps raw search results into display records.
#[derive(Debug, Clone, Copy, Default)]
pub struct ColorIdentityResolver {
    detail_link: DetailLink,
}

impl ColorIdentityResolver {
    pub fn new(detail_link: DetailLink) -> Self {
        Self { detail_link }
    }

    pub fn to_display_record(&self, raw: &ScryfallCard) -> CommanderRecord {
        let image_primary_url = raw
            .image_uris
            .as_ref()
            .and_then(|uris| non_empty(uris.normal.as_deref()));

        let image_fallback_url = raw
            .card_faces
            .as_ref()
            .and_then(|faces| faces.first())
            .and_then(|face| face.image_uris.as_ref())
            .and_then(|uris| non_empty(uris.normal.as_deref()));

        if image_primary_url.is_none() && image_fallback_url.is_none() {
            tracing::debug!("No image available for '{}'", raw.name);
        }

        let detail_url = match self.detail_link {
            DetailLink::CardPage => raw.scryfall_uri.clone(),
            DetailLink::RelatedResource => raw
                .related_uris
                .as_ref()
                .and_then(|uris| non_empty(uris.get("edhrec").map(String::as_str)))
                .unwrap_or_else(|| raw.scryfall_uri.clone()),
        };

        CommanderRecord {
            name: raw.name.clone(),
            image_primary_url,
            image_fallback_url,
            detail_url,
        }
    }

    pub fn select_all(&self, raw: &[ScryfallCard]) -> Vec<CommanderRecord> {
        raw.iter().map(|card| self.to_display_record(card)).collect()
    }

    /// `None` when there is nothing to pick from.
    pub fn select_random_one<R: Rng>(
        &self,
        raw: &[ScryfallCard],
        rng: &mut R,
    ) -> Option<CommanderRecord> {
        if raw.is_empty() {
            return None;
        }

        let draw: f64 = rng.random();
        let index = ((draw * raw.len() as f64) as usize).min(raw.len() - 1);
        tracing::debug!("Picked result {} of {}", index + 1, raw.len());

        Some(self.to_display_record(&raw[index]))
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value.filter(|v| !v.is_empty()).map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{CardFace, ImageUris};
    use std::collections::{HashMap, HashSet};

    fn card(name: &str) -> ScryfallCard {
        ScryfallCard {
            name: name.to_string(),
            image_uris: Some(ImageUris {
                normal: Some(format!("http://x/{}.png", name)),
            }),
            card_faces: None,
            scryfall_uri: format!("http://x/card/{}", name),
            related_uris: None,
        }
    }

    #[test]
    fn normalize_maps_color_words() {
        assert_eq!(normalize("blue-black").unwrap().as_str(), "UB");
        assert_eq!(normalize("White, Red, GREEN!").unwrap().as_str(), "WRG");
    }

    #[test]
    fn normalize_accepts_raw_letters() {
        assert_eq!(normalize("UB").unwrap().as_str(), "UB");
        assert_eq!(normalize("u b").unwrap().as_str(), "UB");
        assert_eq!(normalize("  wubrg ").unwrap().as_str(), "WUBRG");
    }

    #[test]
    fn normalize_rejects_empty_input() {
        assert_eq!(normalize(""), Err(IdentityError::EmptyIdentity));
        assert_eq!(normalize(" - 42 !"), Err(IdentityError::EmptyIdentity));
    }

    #[test]
    fn normalize_rejects_too_many_colors() {
        assert_eq!(
            normalize("wubrgwubrg"),
            Err(IdentityError::TooManyColors {
                candidate: "WUBRGWUBRG".to_string(),
                length: 10,
            })
        );
    }

    #[test]
    fn length_check_runs_before_pattern_check() {
        assert!(matches!(
            normalize("purple orange"),
            Err(IdentityError::TooManyColors { length: 12, .. })
        ));
    }

    #[test]
    fn normalize_rejects_unknown_symbols() {
        assert_eq!(
            normalize("xyz"),
            Err(IdentityError::InvalidColorCode {
                candidate: "XYZ".to_string(),
            })
        );
        assert!(matches!(
            normalize("blue x"),
            Err(IdentityError::InvalidColorCode { .. })
        ));
    }

    #[test]
    fn normalize_keeps_duplicate_colors() {
        assert_eq!(normalize("WW").unwrap().as_str(), "WW");
        assert_eq!(normalize("red red").unwrap().as_str(), "RR");
    }

    #[test]
    fn normalize_is_idempotent_on_success() {
        let inputs = [
            "blue-black",
            "UB",
            "white",
            "g w",
            "Red/Green/White",
            "WW",
            "wubrg",
        ];
        for input in inputs {
            let once = normalize(input).unwrap();
            let twice = normalize(once.as_str()).unwrap();
            assert_eq!(once, twice, "input {:?}", input);
        }
    }

    #[test]
    fn search_query_filters_identity_and_format() {
        let code = normalize("white").unwrap();
        let query = build_search_query(&code);
        assert!(query.as_str().contains("identity=W"));
        assert!(query.as_str().contains("is:commander"));
        assert!(query.as_str().contains("legal:commander"));
    }

    #[test]
    fn name_query_strips_quotes() {
        let query = build_name_query(" Kenrith, the \"Returned\" King ");
        assert_eq!(
            query.as_str(),
            "!\"Kenrith, the Returned King\" is:commander"
        );
    }

    #[test]
    fn display_record_uses_primary_image() {
        let raw: ScryfallCard = serde_json::from_value(serde_json::json!({
            "name": "Test Card",
            "image_uris": {"normal": "http://x/img.png"},
            "scryfall_uri": "http://x/card"
        }))
        .unwrap();

        let record = ColorIdentityResolver::default().to_display_record(&raw);
        assert_eq!(
            record,
            CommanderRecord {
                name: "Test Card".to_string(),
                image_primary_url: Some("http://x/img.png".to_string()),
                image_fallback_url: None,
                detail_url: "http://x/card".to_string(),
            }
        );
    }

    #[test]
    fn display_record_falls_back_to_first_face() {
        let raw: ScryfallCard = serde_json::from_value(serde_json::json!({
            "name": "Front // Back",
            "card_faces": [
                {"name": "Front", "image_uris": {"normal": "http://x/face.png"}},
                {"name": "Back", "image_uris": {"normal": "http://x/back.png"}}
            ],
            "scryfall_uri": "http://x/card"
        }))
        .unwrap();

        let record = ColorIdentityResolver::default().to_display_record(&raw);
        assert_eq!(record.image_primary_url, None);
        assert_eq!(record.image_fallback_url.as_deref(), Some("http://x/face.png"));
        assert_eq!(record.image_url(), Some("http://x/face.png"));
    }

    #[test]
    fn display_record_without_images_leaves_them_absent() {
        let raw = ScryfallCard {
            name: "Blank".to_string(),
            image_uris: Some(ImageUris {
                normal: Some(String::new()),
            }),
            card_faces: Some(vec![CardFace::default()]),
            scryfall_uri: "http://x/card".to_string(),
            related_uris: None,
        };

        let record = ColorIdentityResolver::default().to_display_record(&raw);
        assert_eq!(record.image_primary_url, None);
        assert_eq!(record.image_fallback_url, None);
    }

    #[test]
    fn related_resource_link_falls_back_to_card_page() {
        let mut raw = card("Edgar");
        let resolver = ColorIdentityResolver::new(DetailLink::RelatedResource);
        assert_eq!(resolver.to_display_record(&raw).detail_url, "http://x/card/Edgar");

        raw.related_uris = Some(HashMap::from([(
            "edhrec".to_string(),
            "http://edhrec/edgar".to_string(),
        )]));
        assert_eq!(resolver.to_display_record(&raw).detail_url, "http://edhrec/edgar");
    }

    #[test]
    fn select_all_preserves_order_and_length() {
        let resolver = ColorIdentityResolver::default();
        assert!(resolver.select_all(&[]).is_empty());

        let raw = vec![card("c"), card("a"), card("b")];
        let names: Vec<String> = resolver
            .select_all(&raw)
            .into_iter()
            .map(|r| r.name)
            .collect();
        assert_eq!(names, vec!["c", "a", "b"]);
    }

    #[test]
    fn select_random_one_handles_empty_input() {
        let mut rng = StdRng::seed_from_u64(7);
        assert_eq!(
            ColorIdentityResolver::default().select_random_one(&[], &mut rng),
            None
        );
    }

    #[test]
    fn select_random_one_stays_in_range() {
        let resolver = ColorIdentityResolver::default();
        let raw = vec![card("a"), card("b"), card("c")];
        let expected: HashSet<String> = raw.iter().map(|c| c.name.clone()).collect();

        let mut rng = StdRng::seed_from_u64(11);
        let mut seen = HashSet::new();
        for _ in 0..200 {
            let picked = resolver.select_random_one(&raw, &mut rng).unwrap();
            assert!(expected.contains(&picked.name));
            seen.insert(picked.name);
        }
        assert_eq!(seen, expected);
    }

    #[test]
    fn select_random_one_is_reproducible_with_a_seed() {
        let resolver = ColorIdentityResolver::default();
        let raw: Vec<ScryfallCard> = (0..10).map(|i| card(&i.to_string())).collect();

        let first = resolver.select_random_one(&raw, &mut StdRng::seed_from_u64(3));
        let second = resolver.select_random_one(&raw, &mut StdRng::seed_from_u64(3));
        assert_eq!(first, second);
    }

    #[test]
    fn size_thresholds() {
        assert_eq!(size_for_draw(0.0), 1);
        assert_eq!(size_for_draw(0.1), 1);
        assert_eq!(size_for_draw(0.3), 2);
        assert_eq!(size_for_draw(0.6), 3);
        assert_eq!(size_for_draw(0.85), 4);
        assert_eq!(size_for_draw(0.95), 5);
        assert_eq!(size_for_draw(0.999_999_999), 5);
    }

    #[test]
    fn random_identity_is_a_valid_distinct_code() {
        let mut rng = StdRng::seed_from_u64(99);
        for _ in 0..1_000 {
            let code = generate_random_color_identity(&mut rng);
            assert!((1..=5).contains(&code.len()));

            let unique: HashSet<char> = code.as_str().chars().collect();
            assert_eq!(unique.len(), code.len());
            assert!(code.as_str().chars().all(|c| "WUBRG".contains(c)));
            assert_eq!(normalize(code.as_str()).unwrap(), code);
        }
    }

    #[test]
    fn random_identity_sizes_follow_weights() {
        let mut rng = StdRng::seed_from_u64(2024);
        let trials = 50_000;
        let mut counts = [0usize; MAX_COLORS + 1];
        for _ in 0..trials {
            counts[generate_random_color_identity(&mut rng).len()] += 1;
        }

        for (size, weight) in SIZE_WEIGHTS {
            let observed = counts[size] as f64 / trials as f64;
            assert!(
                (observed - weight).abs() < 0.015,
                "size {} observed {:.4}, expected {:.2}",
                size,
                observed,
                weight
            );
        }
    }

    #[test]
    fn same_seed_gives_same_identities() {
        let mut first = seeded_rng(Some(31));
        let mut second = seeded_rng(Some(31));
        for _ in 0..20 {
            assert_eq!(
                generate_random_color_identity(&mut first),
                generate_random_color_identity(&mut second)
            );
        }

        let unseeded = generate_random_color_identity(&mut seeded_rng(None));
        assert!(normalize(unseeded.as_str()).is_ok());
    }

    #[test]
    fn process_wide_generator_produces_valid_codes() {
        let code = random_color_identity();
        assert!(normalize(code.as_str()).is_ok());
    }
}
