//! Languages and translation tables
//!
//! Every user-facing string lives in one `Translations` record per language.
//! Lookups go through the closed `Language` -> `Translations` mapping; there
//! is no dynamic key construction anywhere.

use serde::{Deserialize, Serialize};

use crate::advisory::Condition;

/// Supported interface languages
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum Language {
    #[default]
    #[serde(rename = "en")]
    English,
    #[serde(rename = "ur")]
    Urdu,
    #[serde(rename = "pa")]
    Punjabi,
}

impl Language {
    /// BCP 47 style language tag
    pub fn code(&self) -> &'static str {
        match self {
            Language::English => "en",
            Language::Urdu => "ur",
            Language::Punjabi => "pa",
        }
    }

    /// Parse a language tag ("en", "ur", "pa")
    pub fn parse(code: &str) -> Option<Self> {
        match code.trim().to_lowercase().as_str() {
            "en" | "english" => Some(Language::English),
            "ur" | "urdu" => Some(Language::Urdu),
            "pa" | "punjabi" => Some(Language::Punjabi),
            _ => None,
        }
    }

    /// Urdu and Punjabi render right-to-left
    pub fn is_rtl(&self) -> bool {
        !matches!(self, Language::English)
    }

    /// English name, used in language directives sent to the model
    pub fn display_name(&self) -> &'static str {
        match self {
            Language::English => "English",
            Language::Urdu => "Urdu",
            Language::Punjabi => "Punjabi",
        }
    }

    pub fn all() -> &'static [Language] {
        &[Language::English, Language::Urdu, Language::Punjabi]
    }
}

/// A piece of text available in all three languages
#[derive(Debug, Clone, Copy)]
pub struct Localized {
    pub en: &'static str,
    pub ur: &'static str,
    pub pa: &'static str,
}

impl Localized {
    pub fn get(&self, lang: Language) -> &'static str {
        match lang {
            Language::English => self.en,
            Language::Urdu => self.ur,
            Language::Punjabi => self.pa,
        }
    }
}

/// Localized UI strings for one language
#[derive(Debug)]
pub struct Translations {
    pub welcome: &'static str,
    pub subtitle: &'static str,
    pub ask_anything: &'static str,
    pub type_question: &'static str,
    pub tab_chat: &'static str,
    pub tab_diagnostic: &'static str,
    pub tab_market: &'static str,
    pub tab_offline: &'static str,
    pub upload_label: &'static str,
    pub analyzing: &'static str,
    pub send: &'static str,
    pub disease_detected: &'static str,
    pub treatment: &'static str,
    pub prevention: &'static str,
    pub confidence: &'static str,
    pub language_label: &'static str,
    pub offline_mode: &'static str,
    pub online_mode: &'static str,
    pub download: &'static str,
    pub view: &'static str,
    pub downloaded: &'static str,
    pub offline_diagnostic_title: &'static str,
    pub offline_diagnostic_desc: &'static str,
    pub select_crop: &'static str,
    pub select_symptom: &'static str,
    pub possible_cause: &'static str,
    pub immediate_action: &'static str,
    pub connect_internet: &'static str,
    pub weather_forecast: &'static str,
    pub humidity: &'static str,
    pub wind: &'static str,
    pub today: &'static str,
    pub tomorrow: &'static str,
    pub yesterday: &'static str,
    pub condition_sunny: &'static str,
    pub condition_partly_cloudy: &'static str,
    pub condition_cloudy: &'static str,
    pub condition_rain: &'static str,
    pub condition_storm: &'static str,
    pub new_chat: &'static str,
    pub chat_history: &'static str,
    pub no_history: &'static str,
    pub delete_chat: &'static str,
}

impl Translations {
    /// Localized label for a weather condition
    pub fn condition_label(&self, condition: Condition) -> &'static str {
        match condition {
            Condition::Sunny => self.condition_sunny,
            Condition::PartlyCloudy => self.condition_partly_cloudy,
            Condition::Cloudy => self.condition_cloudy,
            Condition::Rain => self.condition_rain,
            Condition::Storm => self.condition_storm,
        }
    }
}

static ENGLISH: Translations = Translations {
    welcome: "Welcome to Kissan Dost",
    subtitle: "Your AI Agriculture Expert",
    ask_anything: "Ask me about crops, diseases, or prices...",
    type_question: "Type your question here...",
    tab_chat: "AI Advisor",
    tab_diagnostic: "Crop Doctor",
    tab_market: "Mandi Rates",
    tab_offline: "Offline Guides",
    upload_label: "Upload Crop Photo",
    analyzing: "Analyzing Crop Health...",
    send: "Send",
    disease_detected: "Diagnosis Report",
    treatment: "Treatment Plan",
    prevention: "Prevention",
    confidence: "AI Confidence",
    language_label: "Language / زبان",
    offline_mode: "Offline Mode",
    online_mode: "Online",
    download: "Download",
    view: "View",
    downloaded: "Downloaded",
    offline_diagnostic_title: "Offline Symptom Checker",
    offline_diagnostic_desc: "Internet unavailable. Use this tool for preliminary advice.",
    select_crop: "Select Crop",
    select_symptom: "Select Symptom",
    possible_cause: "Possible Cause",
    immediate_action: "Immediate Action",
    connect_internet: "Connect to internet for full AI analysis",
    weather_forecast: "5-Day Weather Forecast",
    humidity: "Humidity",
    wind: "Wind",
    today: "Today",
    tomorrow: "Tomorrow",
    yesterday: "Yesterday",
    condition_sunny: "Sunny",
    condition_partly_cloudy: "Partly Cloudy",
    condition_cloudy: "Cloudy",
    condition_rain: "Rain",
    condition_storm: "Storm",
    new_chat: "New Chat",
    chat_history: "Chat History",
    no_history: "No previous chats",
    delete_chat: "Delete",
};

static URDU: Translations = Translations {
    welcome: "کسان دوست میں خوش آمدید",
    subtitle: "آپ کا زرعی مصنوعی ذہانت کا ماہر",
    ask_anything: "مجھ سے فصلوں، بیماریوں یا قیمتوں کے بارے میں پوچھیں...",
    type_question: "یہاں سوال لکھیں...",
    tab_chat: "مشیر",
    tab_diagnostic: "فصل ڈاکٹر",
    tab_market: "منڈی کے بھاؤ",
    tab_offline: "آف لائن گائیڈز",
    upload_label: "فصل کی تصویر اپ لوڈ کریں",
    analyzing: "فصل کی صحت کا تجزیہ کیا جا رہا ہے...",
    send: "بھیجیں",
    disease_detected: "تشخیص کی رپورٹ",
    treatment: "علاج کا منصوبہ",
    prevention: "احتیاطی تدابیر",
    confidence: "AI اعتماد",
    language_label: "زبان",
    offline_mode: "آف لائن موڈ",
    online_mode: "آن لائن",
    download: "ڈاؤن لوڈ کریں",
    view: "دیکھیں",
    downloaded: "محفوظ شدہ",
    offline_diagnostic_title: "آف لائن علامات چیکر",
    offline_diagnostic_desc: "انٹرنیٹ دستیاب نہیں۔ ابتدائی مشورے کے لیے یہ آلہ استعمال کریں۔",
    select_crop: "فصل منتخب کریں",
    select_symptom: "علامت منتخب کریں",
    possible_cause: "ممکنہ وجہ",
    immediate_action: "فوری عمل",
    connect_internet: "مکمل AI تجزیہ کے لیے انٹرنیٹ سے منسلک ہوں",
    weather_forecast: "5 دن کی موسم کی پیشن گوئی",
    humidity: "نمی",
    wind: "ہوا",
    today: "آج",
    tomorrow: "کل",
    yesterday: "گزشتہ کل",
    condition_sunny: "دھوپ",
    condition_partly_cloudy: "جزوی بادل",
    condition_cloudy: "بادل",
    condition_rain: "بارش",
    condition_storm: "طوفان",
    new_chat: "نئی بات چیت",
    chat_history: "پرانی بات چیت",
    no_history: "کوئی پرانی بات چیت نہیں",
    delete_chat: "ختم کریں",
};

static PUNJABI: Translations = Translations {
    welcome: "کسان دوست وچ جی آیاں نوں",
    subtitle: "تہاڈا زرعی ماہر",
    ask_anything: "میرے کولوں فصلاں، بیماریاں یا ریٹ پوچھو...",
    type_question: "ایتھے سوال لکھو...",
    tab_chat: "صلاح کار",
    tab_diagnostic: "فصل ڈاکٹر",
    tab_market: "منڈی دے ریٹ",
    tab_offline: "آف لائن گائیڈز",
    upload_label: "فصل دی فوٹو لاؤ",
    analyzing: "فصل دی جانچ پڑتال ہو رہی اے...",
    send: "کلّو",
    disease_detected: "بیماری دی رپورٹ",
    treatment: "علاج",
    prevention: "بچاؤ",
    confidence: "یقین دہانی",
    language_label: "بولی",
    offline_mode: "آف لائن موڈ",
    online_mode: "آن لائن",
    download: "ڈاؤن لوڈ کرو",
    view: "ویکھو",
    downloaded: "محفوظ",
    offline_diagnostic_title: "آف لائن علامات چیکر",
    offline_diagnostic_desc: "نیٹ نئیں چل ریا۔ ابتدائی مشورے لئی اے ورتو۔",
    select_crop: "فصل چنو",
    select_symptom: "علامت چنو",
    possible_cause: "وجہ",
    immediate_action: "فوری عمل",
    connect_internet: "پوری جانچ لئی انٹرنیٹ چلاؤ",
    weather_forecast: "5 دناں دا موسم",
    humidity: "نمی",
    wind: "ہوا",
    today: "اج",
    tomorrow: "کل",
    yesterday: "پچھلا دن",
    condition_sunny: "دھپ",
    condition_partly_cloudy: "تھوڑے بادل",
    condition_cloudy: "بادل",
    condition_rain: "مینھ",
    condition_storm: "طوفان",
    new_chat: "نوی گل بات",
    chat_history: "پرانی گلاں",
    no_history: "کوئی پرانی گل نہیں",
    delete_chat: "مٹاؤ",
};

/// Translation table for a language
pub fn translations(lang: Language) -> &'static Translations {
    match lang {
        Language::English => &ENGLISH,
        Language::Urdu => &URDU,
        Language::Punjabi => &PUNJABI,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_codes() {
        assert_eq!(Language::parse("en"), Some(Language::English));
        assert_eq!(Language::parse("UR"), Some(Language::Urdu));
        assert_eq!(Language::parse(" pa "), Some(Language::Punjabi));
        assert_eq!(Language::parse("punjabi"), Some(Language::Punjabi));
        assert_eq!(Language::parse("fr"), None);
    }

    #[test]
    fn test_rtl() {
        assert!(!Language::English.is_rtl());
        assert!(Language::Urdu.is_rtl());
        assert!(Language::Punjabi.is_rtl());
    }

    #[test]
    fn test_tables_differ() {
        assert_ne!(
            translations(Language::English).ask_anything,
            translations(Language::Urdu).ask_anything
        );
        assert_ne!(
            translations(Language::Urdu).new_chat,
            translations(Language::Punjabi).new_chat
        );
    }

    #[test]
    fn test_condition_labels() {
        let t = translations(Language::English);
        assert_eq!(t.condition_label(Condition::Rain), "Rain");
        assert_eq!(t.condition_label(Condition::PartlyCloudy), "Partly Cloudy");
    }

    #[test]
    fn test_language_tag_serde() {
        let json = serde_json::to_string(&Language::Urdu).unwrap();
        assert_eq!(json, "\"ur\"");
        let back: Language = serde_json::from_str("\"pa\"").unwrap();
        assert_eq!(back, Language::Punjabi);
    }
}
