use std::sync::Mutex;

use super::{AnalysisError, CompletionClient, CompletionRequest};

/// Canned recommendation served in test mode.
pub const TEST_MODE_ANALYSIS: &str = "🔍 **ANALIZA PROCESU (TRYB TESTOWY)**
Proces wykonywany ręcznie, powtarzalny i podatny na błędy.

⚠️ **ZIDENTYFIKOWANE PROBLEMY**
- Ręczne przepisywanie danych
- Brak powiadomień o kolejnych krokach

🛠️ **REKOMENDOWANE ROZWIĄZANIE**
**Narzędzie główne:** Zapier - automatyzacja workflow
**Dodatkowe integracje:** Google Sheets, e-mail
**Stopień automatyzacji:** 80%

💰 **INWESTYCJA**
**Koszt wdrożenia:** 500 zł jednorazowo
**Koszt miesięczny:** 100 zł/mies.

⏱️ **OSZCZĘDNOŚCI**
**Czas:** 20 godzin miesięcznie → 4 godziny (redukcja o 80%)

📋 **PLAN WDROŻENIA** (6 tygodni)
**Tydzień 1-2:** konfiguracja kont i danych
**Tydzień 3-4:** budowa automatyzacji
**Tydzień 5-6:** testy i wdrożenie

⚡ **PIERWSZE KROKI**
1. Załóż konto Zapier
2. Skonfiguruj pierwszy workflow
3. Przetestuj na małej próbce danych

🎯 **OCZEKIWANE REZULTATY**
Mniej pracy ręcznej i mniej pomyłek w ciągu 3 miesięcy.

**UWAGA:** analiza w trybie testowym.";

/// Completion client that never touches the network.
///
/// `new()` and `failing()` record every request for inspection.
/// `failing()` simulates an unreachable service. `canned()` backs the
/// server's test mode and records nothing.
pub struct MockCompletionClient {
    response: Option<String>,
    requests: Option<Mutex<Vec<CompletionRequest>>>,
}

impl MockCompletionClient {
    pub fn new(response: &str) -> Self {
        Self {
            response: Some(response.to_string()),
            requests: Some(Mutex::new(Vec::new())),
        }
    }

    /// Serves [`TEST_MODE_ANALYSIS`] without recording requests.
    pub fn canned() -> Self {
        Self {
            response: Some(TEST_MODE_ANALYSIS.to_string()),
            requests: None,
        }
    }

    pub fn failing() -> Self {
        Self {
            response: None,
            requests: Some(Mutex::new(Vec::new())),
        }
    }

    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests
            .as_ref()
            .and_then(|r| r.lock().ok().map(|r| r.clone()))
            .unwrap_or_default()
    }
}

impl CompletionClient for MockCompletionClient {
    fn complete(&self, request: &CompletionRequest) -> Result<String, AnalysisError> {
        if let Some(Ok(mut seen)) = self.requests.as_ref().map(Mutex::lock) {
            seen.push(request.clone());
        }
        self.response
            .clone()
            .ok_or_else(|| AnalysisError::Connection("mock://unreachable".into()))
    }
}
