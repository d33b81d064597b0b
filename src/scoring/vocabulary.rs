//! Skill synonym and variant vocabulary
//!
//! Maps canonical skill names to alternate spellings, abbreviations and
//! localized forms. The table is symmetric at lookup time: if a canonical
//! entry lists a variant, looking up that variant surfaces the canonical
//! name and its siblings. Every skill additionally gets punctuation-
//! stripped variants, whether or not it appears in the table.

use std::collections::{BTreeSet, HashMap};

pub struct SkillVocabulary {
    table: HashMap<&'static str, Vec<&'static str>>,
}

impl SkillVocabulary {
    pub fn new() -> Self {
        Self {
            table: build_table(),
        }
    }

    /// All known variants of a skill, excluding the input itself.
    /// Lookup is case-insensitive; callers pass any spelling.
    pub fn variants_of(&self, skill: &str) -> BTreeSet<String> {
        let skill_lower = skill.to_lowercase();
        let mut variants: BTreeSet<String> = BTreeSet::new();

        // Forward lookup: canonical -> variants
        if let Some(listed) = self.table.get(skill_lower.as_str()) {
            variants.extend(listed.iter().map(|v| v.to_string()));
        }

        // Reverse lookup: a variant surfaces its canonical name and every
        // sibling variant
        for (canonical, listed) in &self.table {
            if listed.iter().any(|v| *v == skill_lower) {
                variants.insert(canonical.to_string());
                variants.extend(listed.iter().map(|v| v.to_string()));
            }
        }

        // Unconditional punctuation-normalized forms
        variants.insert(skill_lower.replace(' ', ""));
        variants.insert(skill_lower.replace('-', ""));
        variants.insert(skill_lower.replace('_', ""));
        variants.insert(skill_lower.replace('.', ""));

        variants.remove(&skill_lower);
        variants
    }

    /// True when the skill, or any of its variants, is a literal substring
    /// of the (already lowercased) text.
    pub fn matches_text(&self, skill: &str, text_lower: &str) -> bool {
        let skill_lower = skill.to_lowercase();
        if text_lower.contains(&skill_lower) {
            return true;
        }
        self.variants_of(&skill_lower)
            .iter()
            .any(|variant| text_lower.contains(variant))
    }

    /// True when two skill names denote the same skill under variant
    /// equivalence, in either direction.
    pub fn equivalent(&self, a: &str, b: &str) -> bool {
        let a_lower = a.to_lowercase();
        let b_lower = b.to_lowercase();
        if a_lower == b_lower {
            return true;
        }
        self.variants_of(&a_lower).contains(&b_lower)
            || self.variants_of(&b_lower).contains(&a_lower)
    }

    /// Iterator over every (canonical, variant) pair in the hand-authored
    /// table. Used by tests asserting symmetry.
    pub fn table_entries(&self) -> impl Iterator<Item = (&'static str, &'static str)> + '_ {
        self.table
            .iter()
            .flat_map(|(canonical, variants)| variants.iter().map(|v| (*canonical, *v)))
    }
}

impl Default for SkillVocabulary {
    fn default() -> Self {
        Self::new()
    }
}

fn build_table() -> HashMap<&'static str, Vec<&'static str>> {
    let entries: &[(&str, &[&str])] = &[
        // Programming languages
        ("python", &["파이썬", "python3", "python2"]),
        ("javascript", &["js", "자바스크립트", "java script", "ecmascript"]),
        ("java", &["자바"]),
        ("sql", &["에스큐엘", "structured query language", "sequel"]),
        ("r", &["r language", "r programming"]),
        ("c++", &["cpp", "c plus plus", "cplusplus"]),
        ("c#", &["csharp", "c sharp"]),
        ("golang", &["go", "go language"]),
        ("php", &["php7", "php8"]),
        // AI / ML / data
        (
            "rag",
            &["retrieval augmented generation", "검색 증강 생성", "retrieval-augmented generation"],
        ),
        ("mcp", &["model context protocol"]),
        ("llm", &["large language model", "대형 언어 모델", "large language models"]),
        ("nlp", &["natural language processing", "자연어 처리", "natural language"]),
        ("transformers", &["transformer", "huggingface transformers", "transformer models"]),
        ("pytorch", &["torch", "pytorch framework"]),
        ("tensorflow", &["tf", "tensor flow", "tensorflow2"]),
        ("scikit-learn", &["sklearn", "scikit learn", "sci-kit learn"]),
        ("opencv", &["cv2", "open cv", "computer vision"]),
        ("pandas", &["pd", "pandas dataframe"]),
        ("numpy", &["np", "numerical python"]),
        // Cloud / infrastructure
        ("aws", &["amazon web services", "amazon aws"]),
        ("gcp", &["google cloud platform", "google cloud"]),
        ("azure", &["microsoft azure", "azure cloud"]),
        ("docker", &["containerization", "도커"]),
        ("kubernetes", &["k8s", "k8", "쿠버네티스"]),
        // Databases
        ("mysql", &["my sql", "mysql database"]),
        ("postgresql", &["postgres", "postgre sql", "postgresql database"]),
        ("mongodb", &["mongo db", "mongo database"]),
        ("redis", &["redis database", "redis cache"]),
        // Tools / frameworks
        ("power bi", &["powerbi", "파워 bi", "파워비아이", "microsoft power bi"]),
        ("excel", &["엑셀", "microsoft excel", "ms excel", "excel spreadsheet"]),
        ("tableau", &["tableau desktop", "tableau public"]),
        ("git", &["github", "git version control", "version control"]),
        ("react", &["reactjs", "react.js", "react framework"]),
        ("vue", &["vuejs", "vue.js", "vue framework"]),
        ("angular", &["angularjs", "angular framework"]),
        ("node.js", &["nodejs", "node js", "node"]),
        ("django", &["django framework", "django python"]),
        ("flask", &["flask framework", "flask python"]),
        ("fastapi", &["fast api", "fastapi framework"]),
        // Misc
        ("api", &["rest api", "restful api", "web api"]),
        ("html", &["html5", "hypertext markup language"]),
        ("css", &["css3", "cascading style sheets"]),
        ("json", &["javascript object notation"]),
        ("xml", &["extensible markup language"]),
    ];

    entries
        .iter()
        .map(|(canonical, variants)| (*canonical, variants.to_vec()))
        .collect()
}
