//! Prompt assembly for process analysis.
//!
//! Three depths share one layout: process block, optional company context,
//! optional industry hint, then depth-specific instructions and answer
//! format. Answer headings use only icons the PDF sanitizer maps to tags.

use serde::{Deserialize, Serialize};

pub const COMPANY_SIZES: &[&str] = &["1-10 osób", "11-50 osób", "51-200 osób", "200+ osób"];

pub const BUDGETS: &[&str] = &[
    "do 500 zł/mies",
    "500-2000 zł/mies",
    "2000-5000 zł/mies",
    "5000+ zł/mies",
];

/// Selectable industries paired with their integration hint.
pub const INDUSTRY_HINTS: &[(&str, Option<&str>)] = &[
    (
        "IT/Software",
        Some("Uwzględnij integracje z GitHub, Jira, Slack, CI/CD, monitoringiem i systemami zgłoszeń."),
    ),
    (
        "E-commerce/Handel",
        Some("Uwzględnij integracje z Allegro, Amazon, BaseLinker, Shopify, WooCommerce, magazynem i płatnościami online."),
    ),
    (
        "Produkcja",
        Some("Uwzględnij integracje z ERP, MES, IoT, kontrolą jakości i planowaniem produkcji."),
    ),
    (
        "Usługi finansowe",
        Some("Uwzględnij integracje z systemami bankowymi, wymogi KNF, AML, RODO i systemy płatności."),
    ),
    (
        "Marketing/Reklama",
        Some("Uwzględnij integracje z Facebook Ads, Google Ads, MailChimp, HubSpot, analityką i CRM."),
    ),
    (
        "Księgowość",
        Some("Uwzględnij integracje z iFirma, wFirma, SAP, Comarch ERP, JPK, US, ZUS i bankowością."),
    ),
    (
        "Logistyka",
        Some("Uwzględnij integracje z WMS, TMS, śledzeniem przesyłek i API kurierów."),
    ),
    (
        "Edukacja",
        Some("Uwzględnij integracje z LMS, e-learningiem, ewidencją uczestników i certyfikatami."),
    ),
    (
        "Zdrowie",
        Some("Uwzględnij integracje z systemami medycznymi, RODO w ochronie zdrowia, NFZ i e-receptą."),
    ),
    ("Inna", None),
];

pub fn industries() -> impl Iterator<Item = &'static str> {
    INDUSTRY_HINTS.iter().map(|(name, _)| *name)
}

pub fn industry_hint(industry: &str) -> Option<&'static str> {
    INDUSTRY_HINTS
        .iter()
        .find(|(name, _)| *name == industry)
        .and_then(|(_, hint)| *hint)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisDepth {
    /// Short five-point recommendation.
    Basic,
    #[default]
    Deep,
    /// Full report with variants, rollout plan and ROI.
    Expert,
}

impl AnalysisDepth {
    pub const ALL: [AnalysisDepth; 3] = [Self::Basic, Self::Deep, Self::Expert];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Basic => "basic",
            Self::Deep => "deep",
            Self::Expert => "expert",
        }
    }

    /// Polish label shown in the intake form.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Basic => "Podstawowa (szybka)",
            Self::Deep => "Pogłębiona (z wyszukiwaniem)",
            Self::Expert => "Ekspercka (pełna analiza)",
        }
    }

    pub fn max_tokens(&self) -> u32 {
        match self {
            Self::Basic => 2000,
            Self::Deep | Self::Expert => 3000,
        }
    }
}

/// Optional facts about the submitting company. Blank values count as unset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompanyContext {
    #[serde(default)]
    pub company_size: Option<String>,
    #[serde(default)]
    pub industry: Option<String>,
    #[serde(default)]
    pub budget: Option<String>,
}

impl CompanyContext {
    fn field(value: &Option<String>) -> &str {
        value.as_deref().map(str::trim).unwrap_or("")
    }

    pub fn is_empty(&self) -> bool {
        Self::field(&self.company_size).is_empty()
            && Self::field(&self.industry).is_empty()
            && Self::field(&self.budget).is_empty()
    }

    fn render(&self) -> String {
        if self.is_empty() {
            return String::new();
        }
        format!(
            "\n## KONTEKST FIRMY:\n**Wielkość firmy:** {}\n**Branża:** {}\n**Budżet na automatyzację:** {}\n",
            Self::field(&self.company_size),
            Self::field(&self.industry),
            Self::field(&self.budget),
        )
    }

    fn hint(&self) -> String {
        industry_hint(Self::field(&self.industry))
            .map(|hint| format!("\n\n**UWAGI BRANŻOWE:** {hint}"))
            .unwrap_or_default()
    }
}

const BASIC_FORMAT: &str = "Odpowiedz w formacie:
🔍 **ANALIZA:** [główny problem w 2-3 zdaniach]
🛠️ **ROZWIĄZANIE:** [konkretne narzędzie, np. Zapier, Airtable]
💰 **KOSZT:** [szacowany koszt miesięczny]
⏱️ **OSZCZĘDNOŚCI:** [szacowany czas i pieniądze miesięcznie]
⚡ **PIERWSZE KROKI:** [2-3 konkretne kroki]";

const DEEP_INSTRUCTIONS: &str = "## SCHEMAT ANALIZY:
1. Rozłóż proces na kroki: wyzwalacze, działania ręczne, przepływ danych, decyzje, wyniki.
2. Dla każdego kroku oceń czasochłonność, podatność na błędy i powtarzalność.
3. Porównaj aktualne narzędzia no-code/low-code: polskie (iFirma, Comarch, BaseLinker) i globalne (Zapier, Make.com, n8n, Airtable).
4. Zaproponuj warianty: podstawowy, optymalny i premium, z kosztem i stopniem automatyzacji.
5. Opisz plan wdrożenia wariantu optymalnego w fazach tygodniowych.
6. Policz oszczędności czasu i pieniędzy oraz ROI.
7. Wskaż ryzyka i sposoby ich ograniczenia.
8. Jeśli automatyzacja się nie opłaca, zaproponuj alternatywy.

## FORMAT ODPOWIEDZI:
🔍 **ANALIZA PROCESU**
⚠️ **ZIDENTYFIKOWANE PROBLEMY**
🛠️ **REKOMENDOWANE ROZWIĄZANIE**
💰 **INWESTYCJA**
⏱️ **OSZCZĘDNOŚCI**
📋 **PLAN WDROŻENIA**
⚡ **PIERWSZE KROKI**
🎯 **OCZEKIWANE REZULTATY**

Uwzględnij specyfikę polskiego rynku (RODO, JPK, US/ZUS). Podawaj nazwy narzędzi, ceny i czasy wdrożenia.";

const EXPERT_INSTRUCTIONS: &str = "## PEŁNA ANALIZA:
### 1. DEKOMPOZYCJA PROCESU
Każdy krok z czasem, punkty styku, przepływ dokumentów, integracje.
### 2. ANALIZA PROBLEMÓW
Koszty jawne i ukryte, ryzyko błędów, wąskie gardła, wpływ na inne procesy.
### 3. BADANIE RYNKU
Porównanie 5-7 narzędzi, aktualne cenniki, opinie użytkowników, integracje z US, ZUS i JPK.
### 4. WARIANTY ROZWIĄZAŃ
BASIC, STANDARD i PREMIUM.
### 5. PLAN WDROŻENIA (8 tygodni)
Harmonogram tygodniowy, zasoby, punkty kontrolne i KPI, zarządzanie ryzykiem.
### 6. ANALIZA FINANSOWA
Kalkulacja kosztów, ROI, scenariusz optymistyczny i pesymistyczny.
### 7. MONITORING I OPTYMALIZACJA
KPI, narzędzia monitoringu, plan ciągłego doskonalenia.

Każdą sekcję rozpocznij odpowiednią ikoną: 🔍 ⚠️ 🛠️ 💰 ⏱️ 📋 ⚡ 🎯. Bądź bardzo konkretny.";

/// Assemble the completion prompt for one process.
pub fn build_prompt(
    title: &str,
    description: &str,
    depth: AnalysisDepth,
    company: &CompanyContext,
) -> String {
    let context = company.render();
    let hint = company.hint();

    match depth {
        AnalysisDepth::Basic => format!(
            "Przeanalizuj ten proces biznesowy i podaj krótką rekomendację:\n\n\
             PROCES: {title}\nOPIS: {description}\n{context}{hint}\n\n{BASIC_FORMAT}\n"
        ),
        AnalysisDepth::Deep => format!(
            "Jesteś ekspertem w automatyzacji procesów biznesowych i rozwiązaniach no-code/low-code. \
             Przeprowadź pogłębioną analizę procesu i zaproponuj konkretny plan automatyzacji.\n\n\
             ## PROCES DO ANALIZY:\n**Nazwa procesu:** {title}\n**Opis procesu:** {description}\n\
             {context}{hint}\n\n{DEEP_INSTRUCTIONS}\n"
        ),
        AnalysisDepth::Expert => format!(
            "Jesteś ekspertem w automatyzacji procesów biznesowych z 15-letnim doświadczeniem. \
             Przeprowadź najgłębszą możliwą analizę tego procesu.\n\n\
             ## PROCES DO ANALIZY:\n**Nazwa procesu:** {title}\n**Opis procesu:** {description}\n\
             {context}{hint}\n\n{EXPERT_INSTRUCTIONS}\n"
        ),
    }
}
