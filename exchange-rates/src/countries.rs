//! Currency → country lookup.
//!
//! The table is declared once with [`define_countries!`]; its order is the
//! order search results come back in.

use std::collections::HashSet;

use crate::CurrencyCode;

/// Maximum number of codes a country search returns.
pub const SEARCH_LIMIT: usize = 8;

/// Declares the ordered code → country table and its lookup function.
///
/// # Syntax
/// ```ignore
/// define_countries! {
///     "usd" => "United States",
/// }
/// ```
macro_rules! define_countries {
    (
        $( $code:literal => $name:literal ),* $(,)?
    ) => {
        /// Currency code and country display name, in search order.
        pub static COUNTRIES: &[(&str, &str)] = &[
            $( ($code, $name) ),*
        ];

        fn lookup(code: &str) -> Option<&'static str> {
            match code {
                $( $code => Some($name), )*
                _ => None,
            }
        }
    };
}

define_countries! {
    "aed" => "United Arab Emirates",
    "afn" => "Afghanistan",
    "all" => "Albania",
    "amd" => "Armenia",
    "ang" => "Netherlands Antilles",
    "aoa" => "Angola",
    "ars" => "Argentina",
    "aud" => "Australia",
    "awg" => "Aruba",
    "azn" => "Azerbaijan",
    "bam" => "Bosnia and Herzegovina",
    "bbd" => "Barbados",
    "bdt" => "Bangladesh",
    "bgn" => "Bulgaria",
    "bhd" => "Bahrain",
    "bif" => "Burundi",
    "bmd" => "Bermuda",
    "bnd" => "Brunei",
    "bob" => "Bolivia",
    "brl" => "Brazil",
    "bsd" => "Bahamas",
    "btn" => "Bhutan",
    "bwp" => "Botswana",
    "byn" => "Belarus",
    "bzd" => "Belize",
    "cad" => "Canada",
    "cdf" => "Democratic Republic of the Congo",
    "chf" => "Switzerland",
    "clp" => "Chile",
    "cny" => "China",
    "cop" => "Colombia",
    "crc" => "Costa Rica",
    "cup" => "Cuba",
    "cve" => "Cape Verde",
    "czk" => "Czech Republic",
    "djf" => "Djibouti",
    "dkk" => "Denmark",
    "dop" => "Dominican Republic",
    "dzd" => "Algeria",
    "egp" => "Egypt",
    "ern" => "Eritrea",
    "etb" => "Ethiopia",
    "eur" => "European Union",
    "fjd" => "Fiji",
    "fkp" => "Falkland Islands",
    "gbp" => "United Kingdom",
    "gel" => "Georgia",
    "ghs" => "Ghana",
    "gip" => "Gibraltar",
    "gmd" => "Gambia",
    "gnf" => "Guinea",
    "gtq" => "Guatemala",
    "gyd" => "Guyana",
    "hkd" => "Hong Kong",
    "hnl" => "Honduras",
    "htg" => "Haiti",
    "huf" => "Hungary",
    "idr" => "Indonesia",
    "ils" => "Israel",
    "inr" => "India",
    "iqd" => "Iraq",
    "irr" => "Iran",
    "isk" => "Iceland",
    "jmd" => "Jamaica",
    "jod" => "Jordan",
    "jpy" => "Japan",
    "kes" => "Kenya",
    "kgs" => "Kyrgyzstan",
    "khr" => "Cambodia",
    "kmf" => "Comoros",
    "kpw" => "North Korea",
    "krw" => "South Korea",
    "kwd" => "Kuwait",
    "kyd" => "Cayman Islands",
    "kzt" => "Kazakhstan",
    "lak" => "Laos",
    "lbp" => "Lebanon",
    "lkr" => "Sri Lanka",
    "lrd" => "Liberia",
    "lsl" => "Lesotho",
    "lyd" => "Libya",
    "mad" => "Morocco",
    "mdl" => "Moldova",
    "mga" => "Madagascar",
    "mkd" => "North Macedonia",
    "mmk" => "Myanmar",
    "mnt" => "Mongolia",
    "mop" => "Macau",
    "mru" => "Mauritania",
    "mur" => "Mauritius",
    "mvr" => "Maldives",
    "mwk" => "Malawi",
    "mxn" => "Mexico",
    "myr" => "Malaysia",
    "mzn" => "Mozambique",
    "nad" => "Namibia",
    "ngn" => "Nigeria",
    "nio" => "Nicaragua",
    "nok" => "Norway",
    "npr" => "Nepal",
    "nzd" => "New Zealand",
    "omr" => "Oman",
    "pab" => "Panama",
    "pen" => "Peru",
    "pgk" => "Papua New Guinea",
    "php" => "Philippines",
    "pkr" => "Pakistan",
    "pln" => "Poland",
    "pyg" => "Paraguay",
    "qar" => "Qatar",
    "ron" => "Romania",
    "rsd" => "Serbia",
    "rub" => "Russia",
    "rwf" => "Rwanda",
    "sar" => "Saudi Arabia",
    "sbd" => "Solomon Islands",
    "scr" => "Seychelles",
    "sdg" => "Sudan",
    "sek" => "Sweden",
    "sgd" => "Singapore",
    "shp" => "Saint Helena",
    "sle" => "Sierra Leone",
    "sos" => "Somalia",
    "srd" => "Suriname",
    "ssp" => "South Sudan",
    "stn" => "Sao Tome and Principe",
    "syp" => "Syria",
    "szl" => "Eswatini",
    "thb" => "Thailand",
    "tjs" => "Tajikistan",
    "tmt" => "Turkmenistan",
    "tnd" => "Tunisia",
    "top" => "Tonga",
    "try" => "Turkey",
    "ttd" => "Trinidad and Tobago",
    "twd" => "Taiwan",
    "tzs" => "Tanzania",
    "uah" => "Ukraine",
    "ugx" => "Uganda",
    "usd" => "United States",
    "uyu" => "Uruguay",
    "uzs" => "Uzbekistan",
    "ves" => "Venezuela",
    "vnd" => "Vietnam",
    "vuv" => "Vanuatu",
    "wst" => "Samoa",
    "xaf" => "Central African States",
    "xcd" => "Eastern Caribbean States",
    "xof" => "West African States",
    "xpf" => "French Polynesia",
    "yer" => "Yemen",
    "zar" => "South Africa",
    "zmw" => "Zambia",
    "zwl" => "Zimbabwe",
}

/// Country display name for `code`, or the uppercased code when unknown.
pub fn country_name(code: &CurrencyCode) -> String {
    match lookup(code.as_str()) {
        Some(name) => name.to_string(),
        None => code.display_code(),
    }
}

/// Codes whose country name contains `query` (case-insensitive), limited to
/// `candidates`, in table order, at most [`SEARCH_LIMIT`] of them.
///
/// A blank query matches nothing.
pub fn search_by_country<'a>(
    query: &str,
    candidates: impl IntoIterator<Item = &'a CurrencyCode>,
) -> Vec<CurrencyCode> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }

    let candidates: HashSet<&str> = candidates.into_iter().map(CurrencyCode::as_str).collect();

    COUNTRIES
        .iter()
        .filter(|(code, name)| {
            candidates.contains(code) && name.to_lowercase().contains(&needle)
        })
        .take(SEARCH_LIMIT)
        .map(|(code, _)| CurrencyCode(code.to_string()))
        .collect()
}
