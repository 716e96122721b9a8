// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! PrimeTrust custody API client.
//!
//! Each operation builds one JSON:API envelope, sends exactly one request
//! through the owned [`Transport`], and decodes the response envelope. No
//! retries happen here. A `&mut` borrow is needed only for
//! [`PrimeTrustClient::connect`], so sharing a client across tasks needs
//! external synchronization.

use std::str::FromStr;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::auth::{Credentials, Session};
use crate::config::{ClientConfig, Environment};
use crate::error::PrimeTrustError;
use crate::jsonapi::{to_attributes, DataNode, ListQuery, RootDataNode, RootListDataNode};
use crate::models::{Contact, FundTransferMethod};
use crate::transport::{HttpMethod, HttpRequest, HttpResponse, ReqwestTransport, Transport};

/// Endpoint paths, relative to the environment base URL.
pub mod paths {
    pub const JWT_AUTH: &str = "/auth/jwts";
    pub const CUSTODY_AGREEMENT_PREVIEW: &str = "/v2/agreement-previews";
    pub const CUSTODY_ACCOUNT: &str = "/v2/accounts";
    pub const CONTACTS: &str = "/v2/contacts";
    pub const FUND_TRANSFER: &str = "/v2/funds-transfers";
    pub const FUND_TRANSFER_METHODS: &str = "/v2/funds-transfer-methods";
    pub const CONTRIBUTIONS: &str = "/v2/contributions";
    pub const DISBURSEMENTS: &str = "/v2/disbursements";
    pub const USERS: &str = "/v2/users";
}

/// Idempotency/tracing header attached to every POST.
pub const REQUEST_ID_HEADER: &str = "X-Request-ID";

const AUTHORIZATION_HEADER: &str = "Authorization";
const CUSTODIAL_ACCOUNT_TYPE: &str = "custodial";

const KYC_STATUS_INCLUDES: &[&str] = &["cip-checks", "aml-checks", "kyc-document-checks"];
const CONTRIBUTION_INCLUDES: &[&str] = &["funds-transfer"];
const DISBURSEMENT_INCLUDES: &[&str] = &["funds-transfer", "disbursement-authorization"];
const TRANSFER_STATUS_INCLUDES: &[&str] = &["contingent-holds"];

#[derive(Serialize)]
#[serde(rename_all = "kebab-case")]
struct UserAttributes<'a> {
    email: &'a str,
    name: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "kebab-case")]
struct AccountAttributes<'a> {
    account_type: &'static str,
    name: String,
    authorized_signature: &'a str,
    owner: &'a Contact,
}

impl<'a> AccountAttributes<'a> {
    fn custodial(owner: &'a Contact, authorized_signature: &'a str) -> Self {
        Self {
            account_type: CUSTODIAL_ACCOUNT_TYPE,
            name: format!("{}'s Account", owner.name),
            authorized_signature,
            owner,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "kebab-case")]
struct KycAttributes<'a> {
    account_id: &'a str,
    #[serde(flatten)]
    contact: &'a Contact,
}

#[derive(Serialize)]
#[serde(rename_all = "kebab-case")]
struct TransferMethodAttributes<'a> {
    contact_id: &'a str,
    #[serde(flatten)]
    method: &'a FundTransferMethod,
}

#[derive(Serialize)]
#[serde(rename_all = "kebab-case")]
struct TransferAttributes<'a> {
    #[serde(with = "rust_decimal::serde::float")]
    amount: Decimal,
    funds_transfer_method_id: &'a str,
    account_id: &'a str,
}

fn envelope(resource_type: &str, attributes: &impl Serialize) -> Result<RootDataNode, PrimeTrustError> {
    Ok(RootDataNode::new(DataNode::new(
        resource_type,
        to_attributes(attributes)?,
    )))
}

/// Money goes out through `f64`; refuse amounts that would not come back
/// as the same decimal.
fn wire_amount(amount: Decimal) -> Result<Decimal, PrimeTrustError> {
    let exact = amount
        .to_f64()
        .map(|float| float.to_string())
        .and_then(|text| Decimal::from_str(&text).ok())
        .is_some_and(|sent| sent == amount);
    if exact {
        Ok(amount)
    } else {
        Err(PrimeTrustError::UnrepresentableAmount(amount))
    }
}

/// Client for the PrimeTrust v2 API.
///
/// Holds its transport rather than extending one; swap in any
/// [`Transport`] with [`PrimeTrustClient::with_transport`].
pub struct PrimeTrustClient<T = ReqwestTransport> {
    transport: T,
    base_url: String,
    environment: Environment,
    credentials: Credentials,
    session: Session,
}

impl PrimeTrustClient<ReqwestTransport> {
    pub fn new(config: ClientConfig) -> Result<Self, PrimeTrustError> {
        let transport = ReqwestTransport::new(config.timeout)?;
        Ok(Self::with_transport(config, transport))
    }

    /// Build a client from `PRIMETRUST_*` environment variables.
    pub fn from_env() -> Result<Self, PrimeTrustError> {
        Self::new(ClientConfig::from_env()?)
    }
}

impl<T: Transport> PrimeTrustClient<T> {
    pub fn with_transport(config: ClientConfig, transport: T) -> Self {
        Self {
            transport,
            base_url: config.base_url,
            environment: config.environment,
            credentials: Credentials::new(config.email, config.password),
            session: Session::default(),
        }
    }

    pub fn environment(&self) -> Environment {
        self.environment
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn is_connected(&self) -> bool {
        self.session.is_connected()
    }

    /// Exchange the operator credentials for a session token.
    ///
    /// Calling again refreshes the token. A failed refresh keeps the
    /// previous token.
    pub async fn connect(&mut self) -> Result<(), PrimeTrustError> {
        let mut request = self.request(HttpMethod::Post, paths::JWT_AUTH);
        request.basic_auth = Some(self.credentials.basic_auth());

        let response = self.dispatch(request, paths::JWT_AUTH).await?;
        self.session.establish(&response)?;

        info!(
            environment = self.environment.segment(),
            "PrimeTrust session established"
        );
        Ok(())
    }

    /// Create an API user. Does not require a session.
    pub async fn create_api_user(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<DataNode, PrimeTrustError> {
        let body = envelope(
            "user",
            &UserAttributes {
                email,
                name,
                password,
            },
        )?;
        self.post_resource(
            paths::USERS,
            self.session.authorization().ok(),
            ListQuery::new(),
            Some(body),
        )
        .await
    }

    /// Preview the custody agreement a contact would sign.
    pub async fn custody_account_agreement_preview(
        &self,
        contact: &Contact,
    ) -> Result<DataNode, PrimeTrustError> {
        let authorization = self.session.authorization()?;
        let body = envelope(
            "account",
            &AccountAttributes::custodial(contact, &contact.name),
        )?;
        self.post_resource(
            paths::CUSTODY_AGREEMENT_PREVIEW,
            Some(authorization),
            ListQuery::new(),
            Some(body),
        )
        .await
    }

    /// Open a custody account owned and signed by `contact`.
    pub async fn create_custody_account(
        &self,
        contact: &Contact,
    ) -> Result<DataNode, PrimeTrustError> {
        let authorization = self.session.authorization()?;
        let body = envelope(
            "account",
            &AccountAttributes::custodial(contact, &contact.name),
        )?;
        let account = self
            .post_resource(
                paths::CUSTODY_ACCOUNT,
                Some(authorization),
                ListQuery::new(),
                Some(body),
            )
            .await?;
        info!(account_id = ?account.id, "PrimeTrust custody account created");
        Ok(account)
    }

    /// Open a custody account owned by an entity.
    ///
    /// The entity's first related contact signs, not the entity itself.
    pub async fn create_entity_custody_account(
        &self,
        contact: &Contact,
    ) -> Result<DataNode, PrimeTrustError> {
        let authorization = self.session.authorization()?;
        let signatory = contact
            .signatory_name()
            .ok_or(PrimeTrustError::MissingSignatory)?;
        let body = envelope(
            "account",
            &AccountAttributes::custodial(contact, signatory),
        )?;
        let account = self
            .post_resource(
                paths::CUSTODY_ACCOUNT,
                Some(authorization),
                ListQuery::new(),
                Some(body),
            )
            .await?;
        info!(account_id = ?account.id, "PrimeTrust entity custody account created");
        Ok(account)
    }

    /// Trigger the environment-qualified `open` action on an account.
    pub async fn activate_custody_account(
        &self,
        custody_account_id: &str,
    ) -> Result<DataNode, PrimeTrustError> {
        let authorization = self.session.authorization()?;
        let path = format!(
            "{}/{}/{}/open",
            paths::CUSTODY_ACCOUNT,
            custody_account_id,
            self.environment.segment()
        );
        self.post_resource(&path, Some(authorization), ListQuery::new(), None)
            .await
    }

    /// Submit a contact for KYC against an account.
    pub async fn start_custody_kyc_process(
        &self,
        custody_account_id: &str,
        contact: &Contact,
    ) -> Result<DataNode, PrimeTrustError> {
        let authorization = self.session.authorization()?;
        let body = envelope(
            "contacts",
            &KycAttributes {
                account_id: custody_account_id,
                contact,
            },
        )?;
        self.post_resource(
            paths::CONTACTS,
            Some(authorization),
            ListQuery::new(),
            Some(body),
        )
        .await
    }

    /// Look up a contact along with its CIP, AML and document checks.
    pub async fn get_custody_kyc_status(
        &self,
        contact_id: &str,
    ) -> Result<RootListDataNode, PrimeTrustError> {
        let authorization = self.session.authorization()?;
        let query = ListQuery::new()
            .filter("contact.id", "eq", contact_id)
            .include(KYC_STATUS_INCLUDES);
        self.get_list(paths::CONTACTS, authorization, query).await
    }

    pub async fn add_fund_transfer_method(
        &self,
        contact_id: &str,
        transfer_method: &FundTransferMethod,
    ) -> Result<DataNode, PrimeTrustError> {
        let authorization = self.session.authorization()?;
        let body = envelope(
            "funds-transfer-methods",
            &TransferMethodAttributes {
                contact_id,
                method: transfer_method,
            },
        )?;
        self.post_resource(
            paths::FUND_TRANSFER_METHODS,
            Some(authorization),
            ListQuery::new(),
            Some(body),
        )
        .await
    }

    /// Pull `amount` into the account through a funds-transfer method.
    ///
    /// The amount travels as a JSON number. Amounts an `f64` cannot carry
    /// exactly (beyond about 15 significant digits) fail with
    /// [`PrimeTrustError::UnrepresentableAmount`]. The returned envelope
    /// carries the included `funds-transfers` resource.
    pub async fn deposit_funds(
        &self,
        custody_account_id: &str,
        fund_transfer_method_id: &str,
        amount: Decimal,
    ) -> Result<RootDataNode, PrimeTrustError> {
        let authorization = self.session.authorization()?;
        let body = envelope(
            "contributions",
            &TransferAttributes {
                amount: wire_amount(amount)?,
                funds_transfer_method_id: fund_transfer_method_id,
                account_id: custody_account_id,
            },
        )?;
        let contribution = self
            .post_document(
                paths::CONTRIBUTIONS,
                Some(authorization),
                ListQuery::new().include(CONTRIBUTION_INCLUDES),
                Some(body),
            )
            .await?;
        info!(
            contribution_id = ?contribution.data.id,
            account_id = %custody_account_id,
            %amount,
            "PrimeTrust contribution created"
        );
        Ok(contribution)
    }

    /// Push `amount` out of the account through a funds-transfer method.
    ///
    /// Same amount limits as [`deposit_funds`](Self::deposit_funds). The
    /// returned envelope carries the included `funds-transfers` and
    /// `disbursement-authorizations` resources.
    pub async fn withdraw_funds(
        &self,
        custody_account_id: &str,
        fund_transfer_method_id: &str,
        amount: Decimal,
    ) -> Result<RootDataNode, PrimeTrustError> {
        let authorization = self.session.authorization()?;
        let body = envelope(
            "disbursements",
            &TransferAttributes {
                amount: wire_amount(amount)?,
                funds_transfer_method_id: fund_transfer_method_id,
                account_id: custody_account_id,
            },
        )?;
        let disbursement = self
            .post_document(
                paths::DISBURSEMENTS,
                Some(authorization),
                ListQuery::new().include(DISBURSEMENT_INCLUDES),
                Some(body),
            )
            .await?;
        info!(
            disbursement_id = ?disbursement.data.id,
            account_id = %custody_account_id,
            %amount,
            "PrimeTrust disbursement created"
        );
        Ok(disbursement)
    }

    pub async fn get_funds_transfer_status(
        &self,
        funds_transfer_id: &str,
    ) -> Result<RootListDataNode, PrimeTrustError> {
        let authorization = self.session.authorization()?;
        let query = ListQuery::new()
            .filter("id", "eq", funds_transfer_id)
            .include(TRANSFER_STATUS_INCLUDES);
        self.get_list(paths::FUND_TRANSFER, authorization, query)
            .await
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }

    /// Resolve `path` and stamp POSTs with a fresh request id.
    fn request(&self, method: HttpMethod, path: &str) -> HttpRequest {
        let mut request = HttpRequest::new(method, self.url(path));
        if method == HttpMethod::Post {
            request.headers.push((
                REQUEST_ID_HEADER.to_string(),
                Uuid::new_v4().simple().to_string(),
            ));
        }
        request
    }

    async fn post_resource(
        &self,
        path: &str,
        authorization: Option<String>,
        query: ListQuery,
        body: Option<RootDataNode>,
    ) -> Result<DataNode, PrimeTrustError> {
        Ok(self
            .post_document(path, authorization, query, body)
            .await?
            .data)
    }

    async fn post_document(
        &self,
        path: &str,
        authorization: Option<String>,
        query: ListQuery,
        body: Option<RootDataNode>,
    ) -> Result<RootDataNode, PrimeTrustError> {
        let mut request = self.request(HttpMethod::Post, path);
        if let Some(value) = authorization {
            request
                .headers
                .push((AUTHORIZATION_HEADER.to_string(), value));
        }
        request.query = query.into_pairs();
        if let Some(envelope) = body {
            request.body = Some(serde_json::to_value(&envelope)?);
        }

        let body = self.execute(request, path).await?;
        RootDataNode::parse(&body)
    }

    async fn get_list(
        &self,
        path: &str,
        authorization: String,
        query: ListQuery,
    ) -> Result<RootListDataNode, PrimeTrustError> {
        let mut request = self.request(HttpMethod::Get, path);
        request
            .headers
            .push((AUTHORIZATION_HEADER.to_string(), authorization));
        request.query = query.into_pairs();

        let body = self.execute(request, path).await?;
        RootListDataNode::parse(&body)
    }

    /// Send and require a 2xx, returning the raw body.
    async fn execute(&self, request: HttpRequest, path: &str) -> Result<String, PrimeTrustError> {
        let method = request.method;
        let response = self.dispatch(request, path).await?;
        if !response.is_success() {
            warn!(
                method = %method,
                path = %path,
                status = response.status,
                "PrimeTrust request rejected"
            );
            return Err(PrimeTrustError::remote(response.status, &response.body));
        }
        Ok(response.body)
    }

    async fn dispatch(&self, request: HttpRequest, path: &str) -> Result<HttpResponse, PrimeTrustError> {
        let method = request.method;
        debug!(
            method = %method,
            path = %path,
            request_id = request.header(REQUEST_ID_HEADER).unwrap_or("-"),
            "PrimeTrust request"
        );
        let response = self.transport.send(request).await?;
        debug!(
            method = %method,
            path = %path,
            status = response.status,
            "PrimeTrust response"
        );
        Ok(response)
    }
}
