use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusColor {
    Green,
    Yellow,
    Red,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VehicleStatus {
    Active,
    Sold,
    Inactive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DocumentType {
    #[serde(rename = "SOAT")]
    Soat,
    #[serde(rename = "Tecnomecanica")]
    Technomechanical,
    Insurance,
    Registration,
    #[serde(rename = "transit_license")]
    TransitLicense,
}

impl DocumentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentType::Soat => "SOAT",
            DocumentType::Technomechanical => "Tecnomecanica",
            DocumentType::Insurance => "Insurance",
            DocumentType::Registration => "Registration",
            DocumentType::TransitLicense => "transit_license",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AiStatus {
    Pending,
    Processing,
    Completed,
    Warning,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationChannel {
    Email,
    Whatsapp,
    Sms,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryStatus {
    Sent,
    Failed,
    Pending,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub id: i64,
    pub car: i64,
    #[serde(rename = "type")]
    pub doc_type: DocumentType,
    #[serde(default)]
    pub type_display: Option<String>,
    #[serde(default)]
    pub issue_date: Option<NaiveDate>,
    #[serde(default)]
    pub expiry_date: Option<NaiveDate>,
    #[serde(default)]
    pub amount: Option<String>,
    #[serde(default)]
    pub provider: String,
    #[serde(default)]
    pub document_file: Option<String>,
    #[serde(default)]
    pub notes: String,
    pub ai_status: AiStatus,
    #[serde(default)]
    pub ai_feedback: String,
    #[serde(default)]
    pub ai_checked_at: Option<String>,
    #[serde(default)]
    pub ai_payload: Option<Value>,
    #[serde(default)]
    pub license_metadata: Option<Value>,
    #[serde(default)]
    pub is_license_valid: bool,
    #[serde(default)]
    pub license_validation_message: String,
    pub status_indicator: StatusColor,
}

impl Document {
    pub fn display_type(&self) -> &str {
        self.type_display
            .as_deref()
            .filter(|label| !label.is_empty())
            .unwrap_or_else(|| self.doc_type.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credit {
    pub id: i64,
    pub car: i64,
    pub bank: String,
    pub total_amount: String,
    pub monthly_payment: String,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub payment_day: u32,
    pub remaining_balance: String,
    pub next_payment_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Maintenance {
    pub id: i64,
    pub car: i64,
    pub date: NaiveDate,
    pub concept: String,
    #[serde(default)]
    pub cost: Option<String>,
    #[serde(default)]
    pub workshop: String,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub receipt_file: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vehicle {
    pub id: i64,
    #[serde(default)]
    pub user: Option<i64>,
    pub brand: String,
    pub model: String,
    pub plate: String,
    pub year: i32,
    #[serde(default)]
    pub photo: Option<String>,
    #[serde(default)]
    pub estimated_value: Option<String>,
    pub status: VehicleStatus,
    pub health_status: StatusColor,
    #[serde(default)]
    pub documents: Vec<Document>,
    #[serde(default)]
    pub credits: Vec<Credit>,
    #[serde(default)]
    pub maintenances: Vec<Maintenance>,
}

impl Vehicle {
    pub fn label(&self) -> String {
        format!("{} {} ({})", self.brand, self.model, self.plate)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    pub id: i64,
    pub notification_type: NotificationChannel,
    pub message: String,
    pub send_date: String,
    pub status: DeliveryStatus,
    #[serde(default)]
    pub reference_object_id: Option<i64>,
    #[serde(default)]
    pub reference_model: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: i64,
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub phone_number: String,
    #[serde(default = "default_country")]
    pub country: String,
    #[serde(default)]
    pub receive_email_alerts: bool,
    #[serde(default)]
    pub receive_sms_alerts: bool,
    #[serde(default)]
    pub receive_whatsapp_alerts: bool,
    #[serde(default)]
    pub is_verified: bool,
}

fn default_country() -> String {
    "co".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SoatExternal {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub fetched_at: Option<String>,
    #[serde(default)]
    pub policy_number: Option<String>,
    #[serde(default)]
    pub insurer: Option<String>,
    #[serde(default)]
    pub issue_date: Option<String>,
    #[serde(default)]
    pub expiry_date: Option<String>,
    #[serde(default)]
    pub premium: Option<Value>,
    #[serde(default)]
    pub responsibilities: Vec<String>,
    #[serde(default)]
    pub payload: Option<Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SoatSnapshot {
    pub document: Option<Document>,
    pub external: Option<SoatExternal>,
    #[serde(default)]
    pub success: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SoatView {
    pub snapshot: SoatSnapshot,
    pub indicator: StatusColor,
}

/// List endpoints answer either a bare array or a paginated
/// `{ "results": [...] }` wrapper depending on backend settings.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ResourceList<T> {
    Paginated { results: Vec<T> },
    Plain(Vec<T>),
}

impl<T> ResourceList<T> {
    pub fn into_vec(self) -> Vec<T> {
        match self {
            ResourceList::Paginated { results } => results,
            ResourceList::Plain(items) => items,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HealthTally {
    pub total: usize,
    pub green: usize,
    pub yellow: usize,
    pub red: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentBrief {
    pub id: i64,
    #[serde(rename = "type")]
    pub doc_type: DocumentType,
    pub type_display: String,
    pub expiry_date: Option<NaiveDate>,
    pub status_indicator: StatusColor,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VehicleCard {
    pub id: i64,
    pub brand: String,
    pub model: String,
    pub plate: String,
    pub year: i32,
    pub estimated_value: Option<String>,
    pub status: VehicleStatus,
    pub health_status: StatusColor,
    pub document_count: usize,
    pub next_document: Option<DocumentBrief>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardView {
    pub stats: HealthTally,
    pub vehicles: Vec<VehicleCard>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpcomingDocument {
    pub document_id: i64,
    pub car_id: i64,
    pub car_label: String,
    pub type_display: String,
    pub expiry_date: NaiveDate,
    pub days_left: i64,
    pub status_indicator: StatusColor,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StatusBreakdown {
    pub green: usize,
    pub yellow: usize,
    pub red: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpcomingView {
    pub items: Vec<UpcomingDocument>,
    pub breakdown: StatusBreakdown,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimelineEvent {
    pub id: String,
    pub label: String,
    pub date: NaiveDate,
    pub detail: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentWarning {
    pub id: i64,
    pub type_display: String,
    pub ai_feedback: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VehicleDetailView {
    pub vehicle: Vehicle,
    pub next_document: Option<DocumentBrief>,
    pub timeline: Vec<TimelineEvent>,
    pub notifications: Vec<Notification>,
    pub warnings: Vec<DocumentWarning>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterAck {
    pub success: bool,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerifyStatus {
    Success,
    Invalid,
    Expired,
    Error,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyOutcome {
    pub status: VerifyStatus,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertPreferences {
    pub receive_email_alerts: bool,
    pub receive_sms_alerts: bool,
    pub receive_whatsapp_alerts: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentFormPolicy {
    pub default_type: DocumentType,
    pub type_locked: bool,
    pub file_required_types: Vec<DocumentType>,
}
