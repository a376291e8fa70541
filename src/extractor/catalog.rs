//! Catalog of well-known library names
//!
//! Maps lowercase aliases to a canonical display name so that `nextjs`,
//! `Next.js` and `next.js` all resolve to one dependency.

use std::collections::HashMap;

/// Built-in libraries: (canonical name, extra aliases)
const BUILTIN: &[(&str, &[&str])] = &[
    // Python
    ("FastAPI", &[]),
    ("Django", &[]),
    ("Flask", &[]),
    ("pydantic", &[]),
    ("SQLAlchemy", &[]),
    ("Alembic", &[]),
    ("httpx", &[]),
    ("pytest", &[]),
    ("Celery", &[]),
    ("NumPy", &[]),
    ("pandas", &[]),
    ("Polars", &[]),
    ("PyTorch", &["torch"]),
    ("TensorFlow", &[]),
    ("scikit-learn", &["sklearn"]),
    ("LangChain", &[]),
    ("Uvicorn", &[]),
    ("Starlette", &[]),
    // JavaScript / TypeScript
    ("React", &["reactjs", "react.js"]),
    ("Next.js", &["nextjs"]),
    ("Vue", &["vuejs", "vue.js"]),
    ("Nuxt", &["nuxtjs", "nuxt.js"]),
    ("Svelte", &[]),
    ("SvelteKit", &[]),
    ("Angular", &[]),
    ("Express", &["expressjs", "express.js"]),
    ("NestJS", &["nest.js"]),
    ("Node.js", &["nodejs"]),
    ("Deno", &[]),
    ("TypeScript", &[]),
    ("Vite", &[]),
    ("webpack", &[]),
    ("Tailwind CSS", &["tailwind", "tailwindcss"]),
    ("Prisma", &[]),
    ("Drizzle", &["drizzle-orm"]),
    ("tRPC", &[]),
    ("Zod", &[]),
    ("Jest", &[]),
    ("Vitest", &[]),
    ("Playwright", &[]),
    ("Redux", &[]),
    ("TanStack Query", &["react-query", "tanstack-query"]),
    // Rust
    ("tokio", &[]),
    ("serde", &[]),
    ("axum", &[]),
    ("actix-web", &["actix"]),
    ("reqwest", &[]),
    ("clap", &[]),
    ("sqlx", &[]),
    ("Diesel", &[]),
    // Go / JVM / others
    ("Gin", &[]),
    ("Spring Boot", &["spring-boot"]),
    ("Ruby on Rails", &["rails"]),
    ("Laravel", &[]),
    // Data stores and infrastructure
    ("PostgreSQL", &["postgres"]),
    ("MySQL", &[]),
    ("SQLite", &[]),
    ("MongoDB", &["mongo"]),
    ("Redis", &[]),
    ("Kafka", &["apache kafka"]),
    ("Elasticsearch", &[]),
    ("Docker", &[]),
    ("Kubernetes", &["k8s"]),
    ("Terraform", &[]),
    ("GraphQL", &[]),
    ("Supabase", &[]),
    ("Firebase", &[]),
    ("Stripe", &[]),
    ("OpenAI", &[]),
];

/// Aliases that are also everyday English words
///
/// In prose these only count when capitalised: "React" is the library,
/// "react to clicks" is not.
const WORD_LIKE: &[&str] = &[
    "react", "express", "rails", "gin", "mongo", "flask", "celery", "jest", "stripe", "drizzle",
    "diesel", "angular",
];

/// Lookup table from alias to canonical name
#[derive(Debug, Clone)]
pub struct Catalog {
    /// Lowercase alias -> canonical display name
    aliases: HashMap<String, String>,
}

impl Catalog {
    /// Create a catalog with the built-in libraries
    pub fn builtin() -> Self {
        let mut catalog = Self {
            aliases: HashMap::new(),
        };
        for (canonical, aliases) in BUILTIN {
            catalog.insert(canonical, aliases.iter().copied());
        }
        catalog
    }

    /// Create a catalog with the built-in libraries plus extra names
    pub fn with_extra<I, S>(extra: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut catalog = Self::builtin();
        for name in extra {
            let name = name.as_ref().trim();
            if !name.is_empty() {
                catalog.insert(name, std::iter::empty());
            }
        }
        catalog
    }

    fn insert<'a>(&mut self, canonical: &str, aliases: impl Iterator<Item = &'a str>) {
        self.aliases
            .insert(canonical.to_lowercase(), canonical.to_string());
        for alias in aliases {
            self.aliases
                .insert(alias.to_lowercase(), canonical.to_string());
        }
    }

    /// Resolve a name to its canonical form, if it is known
    pub fn canonical(&self, name: &str) -> Option<&str> {
        self.aliases
            .get(&name.trim().to_lowercase())
            .map(String::as_str)
    }

    /// Returns true if an alias needs a capital letter to count in prose
    pub fn is_word_like(&self, alias: &str) -> bool {
        WORD_LIKE.contains(&alias.trim().to_lowercase().as_str())
    }

    /// All aliases, longest first, so that `react.js` wins over `react`
    pub fn aliases_longest_first(&self) -> Vec<&str> {
        let mut aliases: Vec<&str> = self.aliases.keys().map(String::as_str).collect();
        aliases.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
        aliases
    }

    /// Number of aliases known to the catalog
    pub fn len(&self) -> usize {
        self.aliases.len()
    }

    /// Returns true if the catalog has no entries
    pub fn is_empty(&self) -> bool {
        self.aliases.is_empty()
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}
