//! Escrow object types.
//!
//! This module contains the typed forms of every object the analyzer
//! flattens:
//!
//! - [`Deposit`] - The envelope attributes and watermark
//! - [`Header`] - Declared object counts
//! - [`Domain`], [`Host`], [`Contact`], [`Registrar`] - Registry objects
//! - [`IdnTableReference`], [`Nndn`] - IDN tables and non-delegated names
//! - [`EppParams`], [`Policy`] - Server parameters and data policies
//!
//! Also provides the namespace constants and postal info building blocks.

mod common;
mod contact;
mod deposit;
mod domain;
mod epp;
mod header;
mod host;
mod idn;
mod registrar;

pub use common::{
    push_street_padded, statuses, Address, PostalInfo, NAMESPACES, XMLNS_CONTACT,
    XMLNS_DOMAIN, XMLNS_EPP, XMLNS_RDE, XMLNS_RDE_CONTACT, XMLNS_RDE_DOMAIN,
    XMLNS_RDE_EPP_PARAMS, XMLNS_RDE_HEADER, XMLNS_RDE_HOST, XMLNS_RDE_IDN, XMLNS_RDE_NNDN,
    XMLNS_RDE_POLICY, XMLNS_RDE_REGISTRAR, XMLNS_SECDNS,
};

pub use contact::Contact;
pub use deposit::{Deposit, DepositType};
pub use domain::{Domain, DomainContact, DsData, TransferData};
pub use epp::{EppParams, Policy};
pub use header::{Header, HeaderCount};
pub use host::{Host, HostAddress};
pub use idn::{IdnTableReference, Nndn};
pub use registrar::{Registrar, WhoisInfo};
