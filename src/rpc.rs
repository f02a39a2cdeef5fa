// Copyright (c) 2026 The GuardianChain Core developers
// Licensed under the Apache License, Version 2.0 see LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0 or the MIT license, see
// LICENSE-MIT or http://opensource.org/licenses/MIT

//! HTTP surface of the vault daemon. Mutating endpoints require Basic
//! auth against the configured RPC credentials; the read-only GTT
//! endpoints are open.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::sync::Arc;
use warp::http::StatusCode;
use warp::{Filter, Rejection};

use crate::primitives::{Address, Amount, TxHash};
use crate::settings::SETTINGS;
use crate::vault::{ClaimRecord, Distribution, TierStatus, VaultError, VaultInfo, YieldVault};

type JsonReply = warp::reply::WithStatus<warp::reply::Json>;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimRequest {
    pub grief_tier: u8,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DistributeRequest {
    pub author_address: String,
    pub grief_tier: u8,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAdminRequest {
    pub new_admin_address: String,
}

#[derive(Serialize)]
struct ClaimResponse {
    success: bool,
    claim: Distribution,
}

#[derive(Serialize)]
struct DistributeResponse {
    success: bool,
    distribution: Distribution,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct UpdateAdminResponse {
    success: bool,
    transaction_hash: TxHash,
}

#[derive(Serialize)]
struct BalanceResponse {
    balance: Amount,
    formatted: String,
}

#[derive(Serialize)]
struct ErrorBody {
    success: bool,
    error: String,
}

/// Builds the full route tree served by the daemon.
pub fn routes(
    vault: Arc<YieldVault>,
) -> impl Filter<Extract = (impl warp::Reply,), Error = Rejection> + Clone {
    let with_vault = warp::any().map(move || vault.clone());

    let claim = warp::path!("api" / "gtt" / "vault" / "claim")
        .and(warp::post())
        .and(json_body::<ClaimRequest>())
        .and(with_vault.clone())
        .and(warp::header::<String>("authorization"))
        .and_then(handle_claim);

    let distribute = warp::path!("api" / "gtt" / "vault" / "distribute")
        .and(warp::post())
        .and(json_body::<DistributeRequest>())
        .and(with_vault.clone())
        .and(warp::header::<String>("authorization"))
        .and_then(handle_distribute);

    let update_admin = warp::path!("api" / "gtt" / "vault" / "update-admin")
        .and(warp::post())
        .and(json_body::<UpdateAdminRequest>())
        .and(with_vault.clone())
        .and(warp::header::<String>("authorization"))
        .and_then(handle_update_admin);

    let info = warp::path!("api" / "gtt" / "vault" / "info")
        .and(warp::get())
        .and(with_vault.clone())
        .and_then(handle_info);

    let claim_status = warp::path!("api" / "gtt" / "claim-status")
        .and(warp::get())
        .and(with_vault.clone())
        .and_then(handle_claim_status);

    let claim_history = warp::path!("api" / "gtt" / "claim-history")
        .and(warp::get())
        .and(with_vault.clone())
        .and_then(handle_claim_history);

    let balance = warp::path!("api" / "gtt" / "balance")
        .and(warp::get())
        .and(with_vault)
        .and_then(handle_balance);

    claim
        .or(distribute)
        .or(update_admin)
        .or(info)
        .or(claim_status)
        .or(claim_history)
        .or(balance)
}

async fn handle_claim(
    request: ClaimRequest,
    vault: Arc<YieldVault>,
    authorization: String,
) -> Result<JsonReply, Rejection> {
    if !check_authorization_header(&authorization) {
        return Ok(forbidden());
    }

    Ok(match vault.claim(request.grief_tier).await {
        Ok(claim) => ok_reply(&ClaimResponse {
            success: true,
            claim,
        }),
        Err(err) => error_reply(&err),
    })
}

async fn handle_distribute(
    request: DistributeRequest,
    vault: Arc<YieldVault>,
    authorization: String,
) -> Result<JsonReply, Rejection> {
    if !check_authorization_header(&authorization) {
        return Ok(forbidden());
    }

    let author = match Address::from_hex(&request.author_address) {
        Ok(author) => author,
        Err(err) => return Ok(error_reply(&VaultError::invalid(err))),
    };

    Ok(match vault.distribute(author, request.grief_tier).await {
        Ok(distribution) => ok_reply(&DistributeResponse {
            success: true,
            distribution,
        }),
        Err(err) => error_reply(&err),
    })
}

async fn handle_update_admin(
    request: UpdateAdminRequest,
    vault: Arc<YieldVault>,
    authorization: String,
) -> Result<JsonReply, Rejection> {
    if !check_authorization_header(&authorization) {
        return Ok(forbidden());
    }

    let new_admin = match Address::from_hex(&request.new_admin_address) {
        Ok(new_admin) => new_admin,
        Err(err) => return Ok(error_reply(&VaultError::invalid(err))),
    };

    Ok(match vault.update_admin(new_admin).await {
        Ok(transaction_hash) => ok_reply(&UpdateAdminResponse {
            success: true,
            transaction_hash,
        }),
        Err(err) => error_reply(&err),
    })
}

async fn handle_info(vault: Arc<YieldVault>) -> Result<JsonReply, Rejection> {
    let info: VaultInfo = vault.info();
    Ok(ok_reply(&info))
}

async fn handle_claim_status(vault: Arc<YieldVault>) -> Result<JsonReply, Rejection> {
    let status: Vec<TierStatus> = vault.claim_status();
    Ok(ok_reply(&status))
}

async fn handle_claim_history(vault: Arc<YieldVault>) -> Result<JsonReply, Rejection> {
    let history: Vec<ClaimRecord> = vault.claim_history();
    Ok(ok_reply(&history))
}

async fn handle_balance(vault: Arc<YieldVault>) -> Result<JsonReply, Rejection> {
    Ok(match vault.balance().await {
        Ok(balance) => ok_reply(&BalanceResponse {
            formatted: format!("{balance} GTT"),
            balance,
        }),
        Err(err) => error_reply(&err),
    })
}

fn ok_reply<T: Serialize>(body: &T) -> JsonReply {
    warp::reply::with_status(warp::reply::json(body), StatusCode::OK)
}

fn error_reply(err: &VaultError) -> JsonReply {
    let code = if err.is_validation() {
        StatusCode::BAD_REQUEST
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    };
    warp::reply::with_status(
        warp::reply::json(&ErrorBody {
            success: false,
            error: err.to_string(),
        }),
        code,
    )
}

fn forbidden() -> JsonReply {
    warp::reply::with_status(
        warp::reply::json(&"Forbidden".to_owned()),
        StatusCode::FORBIDDEN,
    )
}

fn json_body<T: DeserializeOwned + Send>() -> impl Filter<Extract = (T,), Error = Rejection> + Clone
{
    // When accepting a body, we want a JSON body
    // (and to reject huge payloads)...
    warp::body::content_length_limit(1024 * 16).and(warp::body::json::<T>())
}

/// Hash both stored credentials and given ones and then constant compare
/// the two hashes.
fn check_authorization_header(auth: &str) -> bool {
    let split: Vec<_> = auth.split(' ').collect();

    if split.len() != 2 {
        return false;
    }

    if split[0] != "Basic" {
        return false;
    }

    let decoded = match base64::decode(split[1]) {
        Ok(decoded) => decoded,
        Err(_) => return false,
    };

    let oracle_key = format!(
        "{}:{}",
        SETTINGS.network.rpc_username, SETTINGS.network.rpc_password
    );
    let oracle_hash: [u8; 32] = Sha256::digest(oracle_key.as_bytes()).into();
    let hash: [u8; 32] = Sha256::digest(&decoded).into();

    constant_time_eq::constant_time_eq_32(&oracle_hash, &hash)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};
    use serial_test::serial;

    fn test_vault() -> Arc<YieldVault> {
        Arc::new(YieldVault::simulated(
            Address::from_hex("0xdbF03B407c01E7cD3CBea99509d93f8DDDC8C6FB").unwrap(),
            Address::from_hex("0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed").unwrap(),
            "devnet",
        ))
    }

    fn auth_header() -> String {
        let credentials = format!(
            "{}:{}",
            SETTINGS.network.rpc_username, SETTINGS.network.rpc_password
        );
        format!("Basic {}", base64::encode(credentials))
    }

    #[tokio::test]
    #[serial]
    async fn claim_returns_the_contract_shaped_response() {
        let routes = routes(test_vault());
        let response = warp::test::request()
            .method("POST")
            .path("/api/gtt/vault/claim")
            .header("authorization", auth_header())
            .json(&json!({ "griefTier": 3 }))
            .reply(&routes)
            .await;

        assert_eq!(response.status(), StatusCode::OK);
        let body: Value = serde_json::from_slice(response.body()).unwrap();
        assert_eq!(body["success"], json!(true));
        assert_eq!(body["claim"]["yieldAmount"], json!("30"));
        for key in [
            "transactionHash",
            "blockNumber",
            "gasUsed",
            "status",
            "network",
            "timestamp",
            "claimedBy",
        ] {
            assert!(body["claim"].get(key).is_some(), "missing key {key}");
        }
    }

    #[tokio::test]
    #[serial]
    async fn invalid_tier_is_a_bad_request() {
        let routes = routes(test_vault());
        let response = warp::test::request()
            .method("POST")
            .path("/api/gtt/vault/claim")
            .header("authorization", auth_header())
            .json(&json!({ "griefTier": 9 }))
            .reply(&routes)
            .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: Value = serde_json::from_slice(response.body()).unwrap();
        assert_eq!(body["success"], json!(false));
    }

    #[tokio::test]
    #[serial]
    async fn bad_credentials_are_forbidden() {
        let routes = routes(test_vault());
        let response = warp::test::request()
            .method("POST")
            .path("/api/gtt/vault/claim")
            .header("authorization", "Basic bm90OnJlYWw=")
            .json(&json!({ "griefTier": 1 }))
            .reply(&routes)
            .await;

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    #[serial]
    async fn distribute_validates_the_author_address() {
        let routes = routes(test_vault());
        let response = warp::test::request()
            .method("POST")
            .path("/api/gtt/vault/distribute")
            .header("authorization", auth_header())
            .json(&json!({ "authorAddress": "not-an-address", "griefTier": 2 }))
            .reply(&routes)
            .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    #[serial]
    async fn distribute_accepts_a_checksummed_author() {
        let routes = routes(test_vault());
        let author = "0xfB6916095ca1df60bB79Ce92cE3Ea74c37c5d359";
        let response = warp::test::request()
            .method("POST")
            .path("/api/gtt/vault/distribute")
            .header("authorization", auth_header())
            .json(&json!({ "authorAddress": author, "griefTier": 5 }))
            .reply(&routes)
            .await;

        assert_eq!(response.status(), StatusCode::OK);
        let body: Value = serde_json::from_slice(response.body()).unwrap();
        assert_eq!(body["distribution"]["claimedBy"], json!(author));
        assert_eq!(body["distribution"]["yieldAmount"], json!("50"));
    }

    #[tokio::test]
    #[serial]
    async fn info_is_open_and_reports_development_mode() {
        let routes = routes(test_vault());
        let response = warp::test::request()
            .method("GET")
            .path("/api/gtt/vault/info")
            .reply(&routes)
            .await;

        assert_eq!(response.status(), StatusCode::OK);
        let body: Value = serde_json::from_slice(response.body()).unwrap();
        assert_eq!(body["status"], json!("development"));
        assert_eq!(body["network"], json!("devnet"));
        assert!(body.get("adminAddress").is_some());
        assert!(body.get("tokenAddress").is_some());
    }

    #[tokio::test]
    #[serial]
    async fn claim_then_history_and_status_reflect_it() {
        let vault = test_vault();
        let routes = routes(vault);

        let response = warp::test::request()
            .method("POST")
            .path("/api/gtt/vault/claim")
            .header("authorization", auth_header())
            .json(&json!({ "griefTier": 4 }))
            .reply(&routes)
            .await;
        assert_eq!(response.status(), StatusCode::OK);

        let history = warp::test::request()
            .method("GET")
            .path("/api/gtt/claim-history")
            .reply(&routes)
            .await;
        let body: Value = serde_json::from_slice(history.body()).unwrap();
        assert_eq!(body.as_array().unwrap().len(), 1);
        assert_eq!(body[0]["griefTier"], json!(4));

        let status = warp::test::request()
            .method("GET")
            .path("/api/gtt/claim-status")
            .reply(&routes)
            .await;
        let body: Value = serde_json::from_slice(status.body()).unwrap();
        let tier4 = body
            .as_array()
            .unwrap()
            .iter()
            .find(|s| s["griefTier"] == json!(4))
            .unwrap();
        assert_eq!(tier4["canClaim"], json!(false));

        let balance = warp::test::request()
            .method("GET")
            .path("/api/gtt/balance")
            .reply(&routes)
            .await;
        let body: Value = serde_json::from_slice(balance.body()).unwrap();
        assert_eq!(body["balance"], json!("40"));
        assert_eq!(body["formatted"], json!("40 GTT"));
    }

    #[tokio::test]
    #[serial]
    async fn update_admin_returns_a_transaction_hash() {
        let routes = routes(test_vault());
        let response = warp::test::request()
            .method("POST")
            .path("/api/gtt/vault/update-admin")
            .header("authorization", auth_header())
            .json(&json!({
                "newAdminAddress": "0xD1220A0cf47c7B9Be7A2E6BA89F429762e7b9aDb"
            }))
            .reply(&routes)
            .await;

        assert_eq!(response.status(), StatusCode::OK);
        let body: Value = serde_json::from_slice(response.body()).unwrap();
        assert_eq!(body["success"], json!(true));
        let hash = body["transactionHash"].as_str().unwrap();
        assert!(hash.starts_with("0x"));
        assert_eq!(hash.len(), 66);
    }

    #[test]
    #[serial]
    fn authorization_header_parsing() {
        assert!(check_authorization_header(&auth_header()));
        assert!(!check_authorization_header("Basic"));
        assert!(!check_authorization_header("Bearer abc def"));
        assert!(!check_authorization_header("Basic !!!not-base64!!!"));
    }
}
