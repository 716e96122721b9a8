// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Domain Resources
//!
//! Typed resources sent to and read from PrimeTrust. Each struct's serde
//! attributes are its wire table: `rename_all = "kebab-case"` maps
//! `tax_id_number` to `tax-id-number`, and `skip_serializing_if` marks the
//! fields that must vanish from the attribute bag when unset.
//!
//! Optional fields *without* `skip_serializing_if` are sent as explicit
//! `null`. The API treats "key absent" and "key null" differently, so the
//! distinction is part of each field's declaration.
//!
//! ## Model Categories
//!
//! - **Contacts**: natural persons and companies, with address and phone
//! - **Funds transfer methods**: ACH bank details or a Plaid-linked account
//! - **Questionnaire**: free-text KYC answers for entity accounts

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::jsonapi::Resource;

// =============================================================================
// Contact Models
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContactType {
    #[default]
    NaturalPerson,
    Company,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sex {
    Male,
    Female,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhoneNumber {
    pub country: String,
    pub number: String,
    /// Whether the number accepts SMS.
    #[serde(default)]
    pub sms: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Address {
    pub street_1: String,
    /// Sent as `null` when unset.
    #[serde(default)]
    pub street_2: Option<String>,
    pub postal_code: String,
    pub city: String,
    pub region: String,
    pub country: String,
}

/// A person or company known to PrimeTrust.
///
/// Company contacts list their beneficial owners and signatories in
/// `related_contacts`; the first entry signs entity custody accounts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Contact {
    #[serde(default)]
    pub contact_type: ContactType,
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sex: Option<Sex>,
    #[serde(default)]
    pub tax_id_number: Option<String>,
    #[serde(default)]
    pub tax_country: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default)]
    pub primary_phone_number: Option<PhoneNumber>,
    #[serde(default)]
    pub primary_address: Option<Address>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region_of_formation: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub related_contacts: Vec<Contact>,
}

impl Resource for Contact {
    const TYPE: &'static str = "contacts";
}

impl Contact {
    pub fn natural_person(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            contact_type: ContactType::NaturalPerson,
            name: name.into(),
            email: email.into(),
            date_of_birth: None,
            sex: None,
            tax_id_number: None,
            tax_country: None,
            label: None,
            primary_phone_number: None,
            primary_address: None,
            region_of_formation: None,
            related_contacts: Vec::new(),
        }
    }

    pub fn company(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            contact_type: ContactType::Company,
            ..Self::natural_person(name, email)
        }
    }

    pub fn with_date_of_birth(mut self, date_of_birth: NaiveDate) -> Self {
        self.date_of_birth = Some(date_of_birth);
        self
    }

    pub fn with_sex(mut self, sex: Sex) -> Self {
        self.sex = Some(sex);
        self
    }

    pub fn with_tax_id(mut self, number: impl Into<String>, country: impl Into<String>) -> Self {
        self.tax_id_number = Some(number.into());
        self.tax_country = Some(country.into());
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_phone_number(mut self, phone: PhoneNumber) -> Self {
        self.primary_phone_number = Some(phone);
        self
    }

    pub fn with_address(mut self, address: Address) -> Self {
        self.primary_address = Some(address);
        self
    }

    pub fn with_region_of_formation(mut self, region: impl Into<String>) -> Self {
        self.region_of_formation = Some(region.into());
        self
    }

    pub fn with_related_contact(mut self, contact: Contact) -> Self {
        self.related_contacts.push(contact);
        self
    }

    /// Name of the contact who signs an entity account, if any.
    pub fn signatory_name(&self) -> Option<&str> {
        self.related_contacts.first().map(|c| c.name.as_str())
    }
}

// =============================================================================
// Funds Transfer Method Models
// =============================================================================

/// Bank (ACH) or Plaid-linked method used for contributions and
/// disbursements.
///
/// ACH methods carry the `bank_account_*` and routing fields; Plaid methods
/// carry the `plaid_*` fields. Whichever set is unused stays off the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct FundTransferMethod {
    pub bank_account_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub routing_number: Option<String>,
    pub ip_address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bank_account_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bank_account_number: Option<String>,
    pub ach_check_type: String,
    pub funds_transfer_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plaid_public_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plaid_account_id: Option<String>,
}

impl Resource for FundTransferMethod {
    const TYPE: &'static str = "funds-transfer-methods";
}

/// Transfer rail for both ACH and Plaid methods.
const ACH_TRANSFER_TYPE: &str = "ach";

impl FundTransferMethod {
    /// ACH method from raw bank details.
    ///
    /// `bank_account_type` is e.g. `checking` or `savings`; `ach_check_type`
    /// is `personal` or `business`.
    pub fn ach(
        bank_account_name: impl Into<String>,
        routing_number: impl Into<String>,
        bank_account_number: impl Into<String>,
        bank_account_type: impl Into<String>,
        ach_check_type: impl Into<String>,
        ip_address: impl Into<String>,
    ) -> Self {
        Self {
            bank_account_name: bank_account_name.into(),
            routing_number: Some(routing_number.into()),
            ip_address: ip_address.into(),
            bank_account_type: Some(bank_account_type.into()),
            bank_account_number: Some(bank_account_number.into()),
            ach_check_type: ach_check_type.into(),
            funds_transfer_type: ACH_TRANSFER_TYPE.to_string(),
            plaid_public_token: None,
            plaid_account_id: None,
        }
    }

    /// ACH method backed by a Plaid Link public token.
    pub fn plaid(
        bank_account_name: impl Into<String>,
        plaid_public_token: impl Into<String>,
        plaid_account_id: impl Into<String>,
        ach_check_type: impl Into<String>,
        ip_address: impl Into<String>,
    ) -> Self {
        Self {
            bank_account_name: bank_account_name.into(),
            routing_number: None,
            ip_address: ip_address.into(),
            bank_account_type: None,
            bank_account_number: None,
            ach_check_type: ach_check_type.into(),
            funds_transfer_type: ACH_TRANSFER_TYPE.to_string(),
            plaid_public_token: Some(plaid_public_token.into()),
            plaid_account_id: Some(plaid_account_id.into()),
        }
    }

    pub fn is_plaid(&self) -> bool {
        self.plaid_public_token.is_some()
    }
}

// =============================================================================
// Questionnaire Models
// =============================================================================

/// Free-text KYC answers collected for entity accounts.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct AccountQuestionnaire {
    pub nature_of_business_of_the_company: String,
    pub purpose_of_account: String,
    pub source_of_assets_and_income: String,
    pub intended_use_of_account: String,
    pub anticipated_monthly_cash_volume: String,
    pub anticipated_monthly_transactions_incoming: String,
    pub anticipated_monthly_transactions_outgoing: String,
    pub anticipated_types_of_assets: String,
    pub anticipated_trading_patterns: String,
    pub associations_with_other_accounts: String,
}

impl Resource for AccountQuestionnaire {
    const TYPE: &'static str = "account-questionnaires";
}
