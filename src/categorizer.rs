//! Keyword-based article categorization.
//!
//! Assigns every article exactly one label from a fixed, closed taxonomy
//! tuned to Congolese and African news sources. Classification is a pure
//! function of `(title, content, source)`: each category carries a keyword
//! list, the score is the number of distinct keywords appearing as
//! substrings of the lowercased title + content, and a small per-source
//! bonus table nudges sources toward their usual beats. The highest score
//! wins; ties resolve to the category declared first in [`CATEGORY_RULES`].
//!
//! The rule and bonus tables are plain data so that new categories or
//! keywords can be added without touching the scoring algorithm.

/// Fallback label used when no keyword matches and no bonus applies.
pub const GENERAL: &str = "général";

/// A category label together with its keyword list.
///
/// Keywords are matched as lowercase substrings; multi-word phrases are
/// allowed. Scoring counts distinct keyword hits, not occurrences.
#[derive(Debug)]
pub struct CategoryRule {
    /// The category label as delivered to the ingestion API.
    pub label: &'static str,
    /// Keywords and phrases scoring one point each when present.
    pub keywords: &'static [&'static str],
}

/// Additive score adjustments applied when an article comes from a source
/// with a known editorial focus.
#[derive(Debug)]
pub struct SourceBonus {
    /// Source name as reported by the scraper.
    pub source: &'static str,
    /// `(category label, points)` pairs added to the keyword scores.
    pub bonuses: &'static [(&'static str, u32)],
}

/// Category rules in priority order: on a tie the first declared category
/// wins.
pub static CATEGORY_RULES: &[CategoryRule] = &[
    CategoryRule {
        label: "politique",
        keywords: &[
            "politique",
            "gouvernement",
            "président",
            "ministre",
            "parlement",
            "assemblée",
            "sénat",
            "député",
            "sénateur",
            "élection",
            "vote",
            "cabinet",
            "premier ministre",
            "opposition",
            "parti politique",
            "tshisekedi",
            "kabila",
            "katumbi",
            "bemba",
            "kengo",
            "lumumba",
            "kinshasa",
            "palais de la nation",
            "conseil des ministres",
            "constitution",
            "démocratie",
            "dictature",
            "coup d'état",
            "diplomatie",
            "ambassadeur",
            "consulat",
            "chancellerie",
        ],
    },
    CategoryRule {
        label: "économie",
        keywords: &[
            "économie",
            "économique",
            "dollar",
            "franc",
            "inflation",
            "banque",
            "monnaie",
            "devise",
            "commerce",
            "marché",
            "prix",
            "coût",
            "budget",
            "finances",
            "fiscal",
            "investissement",
            "entreprise",
            "business",
            "industrie",
            "production",
            "exportation",
            "importation",
            "pib",
            "croissance",
            "récession",
            "bourse",
            "crédit",
            "banque centrale",
            "fmi",
            "banque mondiale",
            "dette",
            "cobalt",
            "cuivre",
            "or",
            "diamant",
            "coltan",
            "minerai",
            "agriculture",
            "café",
            "cacao",
            "huile de palme",
        ],
    },
    CategoryRule {
        label: "sécurité",
        keywords: &[
            "sécurité",
            "guerre",
            "conflit",
            "violence",
            "armée",
            "militaire",
            "police",
            "gendarmerie",
            "soldat",
            "casques bleus",
            "monusco",
            "rebelle",
            "milice",
            "adf",
            "m23",
            "codeco",
            "mai-mai",
            "terrorisme",
            "kidnapping",
            "enlèvement",
            "banditisme",
            "criminalité",
            "vol",
            "meurtre",
            "assassinat",
            "attentat",
            "nord-kivu",
            "sud-kivu",
            "ituri",
            "goma",
            "bukavu",
            "bunia",
            "déplacés",
            "réfugiés",
            "camp de déplacés",
            "hcr",
            "cessez-le-feu",
            "accord de paix",
            "médiation",
        ],
    },
    CategoryRule {
        label: "société",
        keywords: &[
            "société",
            "social",
            "éducation",
            "école",
            "université",
            "étudiant",
            "santé",
            "hôpital",
            "médecin",
            "maladie",
            "épidémie",
            "vaccination",
            "ébola",
            "paludisme",
            "covid",
            "choléra",
            "rougeole",
            "famille",
            "femme",
            "enfant",
            "jeune",
            "vieux",
            "âgé",
            "culture",
            "tradition",
            "langue",
            "religion",
            "église",
            "mosquée",
            "catholicisme",
            "protestantisme",
            "islam",
            "animisme",
            "mariage",
            "divorce",
            "naissance",
            "décès",
            "funérailles",
            "fête",
            "célébration",
            "carnaval",
            "festival",
        ],
    },
    CategoryRule {
        label: "sport",
        keywords: &[
            "sport",
            "football",
            "basket",
            "volleyball",
            "tennis",
            "boxe",
            "athlétisme",
            "natation",
            "cyclisme",
            "rugby",
            "handball",
            "championnat",
            "coupe",
            "match",
            "équipe",
            "joueur",
            "entraîneur",
            "stade",
            "terrain",
            "ballon",
            "but",
            "score",
            "victoire",
            "défaite",
            "fifa",
            "caf",
            "chan",
            "can",
            "léopards",
            "tp mazembe",
            "v.club",
            "as vita club",
            "dc motema pembe",
            "fc saint eloi lupopo",
            "champion",
            "titre",
            "remporte",
            "gagne",
            "bat",
            "battent",
            "compétition",
            "tournoi",
            "finale",
            "demi-finale",
            "qualification",
        ],
    },
    CategoryRule {
        label: "technologie",
        keywords: &[
            "technologie",
            "numérique",
            "digital",
            "internet",
            "web",
            "smartphone",
            "téléphone",
            "mobile",
            "ordinateur",
            "laptop",
            "application",
            "app",
            "logiciel",
            "software",
            "programme",
            "intelligence artificielle",
            "ia",
            "robot",
            "automatisation",
            "blockchain",
            "cryptomonnaie",
            "bitcoin",
            "fintech",
            "startup",
            "innovation",
            "recherche",
            "développement",
            "télécommunication",
            "réseau",
            "4g",
            "5g",
            "fibre optique",
        ],
    },
    CategoryRule {
        label: "environnement",
        keywords: &[
            "environnement",
            "climat",
            "réchauffement",
            "pollution",
            "déforestation",
            "forêt",
            "parc national",
            "biodiversité",
            "conservation",
            "écologie",
            "écologique",
            "vert",
            "durable",
            "carbone",
            "émission",
            "gaz",
            "effet de serre",
            "congo basin",
            "virunga",
            "garamba",
            "upemba",
            "kundelungu",
            "fleuve congo",
            "lac tanganyika",
            "lac kivu",
            "lac albert",
            "changement climatique",
            "impact",
            "météorologique",
            "gorilles",
            "rangers",
            "braconnage",
            "protection",
            "faune",
        ],
    },
    CategoryRule {
        label: "international",
        keywords: &[
            "international",
            "mondial",
            "global",
            "planète",
            "monde",
            "états-unis",
            "amérique",
            "europe",
            "asie",
            "chine",
            "russie",
            "france",
            "belgique",
            "allemagne",
            "royaume-uni",
            "onu",
            "union africaine",
            "cedeao",
            "sadc",
            "cemac",
            "comesa",
            "union européenne",
            "otan",
            "g7",
            "g20",
            "sommet",
            "coopération",
            "aide",
            "partenariat",
            "accord bilatéral",
        ],
    },
];

/// Per-source score bonuses. International outlets get a flat boost toward
/// `international`; the Congolese outlets lean toward their usual beats.
pub static SOURCE_BONUSES: &[SourceBonus] = &[
    SourceBonus {
        source: "BBC News",
        bonuses: &[("international", 2)],
    },
    SourceBonus {
        source: "France24",
        bonuses: &[("international", 2)],
    },
    SourceBonus {
        source: "Radio Okapi",
        bonuses: &[("politique", 1), ("sécurité", 1)],
    },
    SourceBonus {
        source: "MediaCongo",
        bonuses: &[("économie", 1), ("société", 1)],
    },
];

/// Categorize an article from its title, content, and source.
///
/// Deterministic and side-effect free; never fails. An empty title yields
/// [`GENERAL`] immediately, and so does a combined text matching no keyword
/// when no source bonus applies.
pub fn categorize(title: &str, content: &str, source: &str) -> &'static str {
    if title.is_empty() {
        return GENERAL;
    }

    let combined_text = format!("{} {}", title.to_lowercase(), content.to_lowercase());

    let mut scores: Vec<(&'static str, u32)> = CATEGORY_RULES
        .iter()
        .map(|rule| {
            let hits = rule
                .keywords
                .iter()
                .filter(|keyword| combined_text.contains(**keyword))
                .count() as u32;
            (rule.label, hits)
        })
        .collect();

    if let Some(bonus) = SOURCE_BONUSES.iter().find(|b| b.source == source) {
        for (label, points) in bonus.bonuses {
            if let Some(entry) = scores.iter_mut().find(|(l, _)| l == label) {
                entry.1 += points;
            }
        }
    }

    // First declared category wins on ties, hence the strict comparison.
    let mut best_label = GENERAL;
    let mut best_score = 0u32;
    for (label, score) in scores {
        if score > best_score {
            best_label = label;
            best_score = score;
        }
    }

    if best_score == 0 { GENERAL } else { best_label }
}

/// Every label the categorizer can produce, [`GENERAL`] included.
pub fn all_categories() -> Vec<&'static str> {
    CATEGORY_RULES
        .iter()
        .map(|rule| rule.label)
        .chain(std::iter::once(GENERAL))
        .collect()
}

/// Whether `category` belongs to the closed taxonomy.
pub fn is_valid_category(category: &str) -> bool {
    all_categories().iter().any(|label| *label == category)
}
