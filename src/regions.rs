//! Country name → region lookup, with a patch list that splits one region in two.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Continents keyed by the country names used in indicator exports.
const CONTINENTS: &[(&str, &str)] = &[
    ("Algeria", "Africa"),
    ("Angola", "Africa"),
    ("Benin", "Africa"),
    ("Botswana", "Africa"),
    ("Burkina Faso", "Africa"),
    ("Burundi", "Africa"),
    ("Cameroon", "Africa"),
    ("Cape Verde", "Africa"),
    ("Central African Republic", "Africa"),
    ("Chad", "Africa"),
    ("Comoros", "Africa"),
    ("Congo", "Africa"),
    ("Cote d'Ivoire", "Africa"),
    ("Democratic Republic of Congo", "Africa"),
    ("Djibouti", "Africa"),
    ("Egypt", "Africa"),
    ("Equatorial Guinea", "Africa"),
    ("Eritrea", "Africa"),
    ("Eswatini", "Africa"),
    ("Ethiopia", "Africa"),
    ("Gabon", "Africa"),
    ("Gambia", "Africa"),
    ("Ghana", "Africa"),
    ("Guinea", "Africa"),
    ("Guinea-Bissau", "Africa"),
    ("Kenya", "Africa"),
    ("Lesotho", "Africa"),
    ("Liberia", "Africa"),
    ("Libya", "Africa"),
    ("Madagascar", "Africa"),
    ("Malawi", "Africa"),
    ("Mali", "Africa"),
    ("Mauritania", "Africa"),
    ("Mauritius", "Africa"),
    ("Morocco", "Africa"),
    ("Mozambique", "Africa"),
    ("Namibia", "Africa"),
    ("Niger", "Africa"),
    ("Nigeria", "Africa"),
    ("Rwanda", "Africa"),
    ("Sao Tome and Principe", "Africa"),
    ("Senegal", "Africa"),
    ("Seychelles", "Africa"),
    ("Sierra Leone", "Africa"),
    ("Somalia", "Africa"),
    ("South Africa", "Africa"),
    ("South Sudan", "Africa"),
    ("Sudan", "Africa"),
    ("Tanzania", "Africa"),
    ("Togo", "Africa"),
    ("Tunisia", "Africa"),
    ("Uganda", "Africa"),
    ("Zambia", "Africa"),
    ("Zimbabwe", "Africa"),
    ("Antigua and Barbuda", "Americas"),
    ("Argentina", "Americas"),
    ("Bahamas", "Americas"),
    ("Barbados", "Americas"),
    ("Belize", "Americas"),
    ("Bolivia", "Americas"),
    ("Brazil", "Americas"),
    ("Canada", "Americas"),
    ("Chile", "Americas"),
    ("Colombia", "Americas"),
    ("Costa Rica", "Americas"),
    ("Cuba", "Americas"),
    ("Dominica", "Americas"),
    ("Dominican Republic", "Americas"),
    ("Ecuador", "Americas"),
    ("El Salvador", "Americas"),
    ("Grenada", "Americas"),
    ("Guatemala", "Americas"),
    ("Guyana", "Americas"),
    ("Haiti", "Americas"),
    ("Honduras", "Americas"),
    ("Jamaica", "Americas"),
    ("Mexico", "Americas"),
    ("Nicaragua", "Americas"),
    ("Panama", "Americas"),
    ("Paraguay", "Americas"),
    ("Peru", "Americas"),
    ("Saint Kitts and Nevis", "Americas"),
    ("Saint Lucia", "Americas"),
    ("Saint Vincent and the Grenadines", "Americas"),
    ("Suriname", "Americas"),
    ("Trinidad and Tobago", "Americas"),
    ("United States", "Americas"),
    ("Uruguay", "Americas"),
    ("Venezuela", "Americas"),
    ("Afghanistan", "Asia"),
    ("Armenia", "Asia"),
    ("Azerbaijan", "Asia"),
    ("Bahrain", "Asia"),
    ("Bangladesh", "Asia"),
    ("Bhutan", "Asia"),
    ("Brunei", "Asia"),
    ("Cambodia", "Asia"),
    ("China", "Asia"),
    ("Georgia", "Asia"),
    ("India", "Asia"),
    ("Indonesia", "Asia"),
    ("Iran", "Asia"),
    ("Iraq", "Asia"),
    ("Israel", "Asia"),
    ("Japan", "Asia"),
    ("Jordan", "Asia"),
    ("Kazakhstan", "Asia"),
    ("Kuwait", "Asia"),
    ("Kyrgyzstan", "Asia"),
    ("Laos", "Asia"),
    ("Lebanon", "Asia"),
    ("Malaysia", "Asia"),
    ("Maldives", "Asia"),
    ("Mongolia", "Asia"),
    ("Myanmar", "Asia"),
    ("Nepal", "Asia"),
    ("North Korea", "Asia"),
    ("Oman", "Asia"),
    ("Pakistan", "Asia"),
    ("Palestine", "Asia"),
    ("Philippines", "Asia"),
    ("Qatar", "Asia"),
    ("Saudi Arabia", "Asia"),
    ("Singapore", "Asia"),
    ("South Korea", "Asia"),
    ("Sri Lanka", "Asia"),
    ("Syria", "Asia"),
    ("Tajikistan", "Asia"),
    ("Thailand", "Asia"),
    ("Timor", "Asia"),
    ("Turkey", "Asia"),
    ("Turkmenistan", "Asia"),
    ("United Arab Emirates", "Asia"),
    ("Uzbekistan", "Asia"),
    ("Vietnam", "Asia"),
    ("Yemen", "Asia"),
    ("Albania", "Europe"),
    ("Andorra", "Europe"),
    ("Austria", "Europe"),
    ("Belarus", "Europe"),
    ("Belgium", "Europe"),
    ("Bosnia and Herzegovina", "Europe"),
    ("Bulgaria", "Europe"),
    ("Croatia", "Europe"),
    ("Cyprus", "Europe"),
    ("Czechia", "Europe"),
    ("Denmark", "Europe"),
    ("Estonia", "Europe"),
    ("Finland", "Europe"),
    ("France", "Europe"),
    ("Germany", "Europe"),
    ("Greece", "Europe"),
    ("Hungary", "Europe"),
    ("Iceland", "Europe"),
    ("Ireland", "Europe"),
    ("Italy", "Europe"),
    ("Latvia", "Europe"),
    ("Lithuania", "Europe"),
    ("Luxembourg", "Europe"),
    ("Malta", "Europe"),
    ("Moldova", "Europe"),
    ("Monaco", "Europe"),
    ("Montenegro", "Europe"),
    ("Netherlands", "Europe"),
    ("North Macedonia", "Europe"),
    ("Norway", "Europe"),
    ("Poland", "Europe"),
    ("Portugal", "Europe"),
    ("Romania", "Europe"),
    ("Russia", "Europe"),
    ("San Marino", "Europe"),
    ("Serbia", "Europe"),
    ("Slovakia", "Europe"),
    ("Slovenia", "Europe"),
    ("Spain", "Europe"),
    ("Sweden", "Europe"),
    ("Switzerland", "Europe"),
    ("Ukraine", "Europe"),
    ("United Kingdom", "Europe"),
    ("Australia", "Oceania"),
    ("Fiji", "Oceania"),
    ("Kiribati", "Oceania"),
    ("Marshall Islands", "Oceania"),
    ("Micronesia (country)", "Oceania"),
    ("Nauru", "Oceania"),
    ("New Zealand", "Oceania"),
    ("Palau", "Oceania"),
    ("Papua New Guinea", "Oceania"),
    ("Samoa", "Oceania"),
    ("Solomon Islands", "Oceania"),
    ("Tonga", "Oceania"),
    ("Tuvalu", "Oceania"),
    ("Vanuatu", "Oceania"),
];

/// Splits `region` in two: allow-listed countries go to `inside`, the rest to `outside`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionPatch {
    pub region: String,
    pub inside: String,
    pub outside: String,
    pub countries: Vec<String>,
}

impl RegionPatch {
    /// The patch used for the improved chart: North America vs. the rest of the Americas.
    pub fn americas_split() -> Self {
        Self {
            region: "Americas".into(),
            inside: "North America".into(),
            outside: "South America".into(),
            countries: ["United States", "Canada", "Mexico"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }

    fn apply(&self, country: &str, region: &str) -> Option<String> {
        if region != self.region {
            return None;
        }
        if self.countries.iter().any(|c| c == country) {
            Some(self.inside.clone())
        } else {
            Some(self.outside.clone())
        }
    }
}

/// Name → region lookup plus patch list.
#[derive(Debug, Clone)]
pub struct RegionTable {
    by_name: HashMap<String, String>,
    patches: Vec<RegionPatch>,
}

impl Default for RegionTable {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl RegionTable {
    /// Built-in continent table with the given patches.
    pub fn new(patches: Vec<RegionPatch>) -> Self {
        let by_name = CONTINENTS
            .iter()
            .map(|(c, r)| (c.to_string(), r.to_string()))
            .collect();
        Self { by_name, patches }
    }

    /// Add or replace lookup entries (e.g. from the pipeline config).
    pub fn with_entries<I>(mut self, entries: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        self.by_name.extend(entries);
        self
    }

    pub fn lookup(&self, country: &str) -> Option<&str> {
        self.by_name.get(country).map(|s| s.as_str())
    }

    /// Region for `country`, preferring `given` (from the data) over the lookup table.
    /// The first patch whose region matches decides the sub-region.
    pub fn assign(&self, country: &str, given: Option<&str>) -> Option<String> {
        let base = given
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .or_else(|| self.lookup(country))?;
        let patched = self.patches.iter().find_map(|p| p.apply(country, base));
        Some(patched.unwrap_or_else(|| base.to_string()))
    }
}
