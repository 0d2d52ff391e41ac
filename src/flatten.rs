//! Flattening of decoded objects into table rows.
//!
//! Each routine writes the object's main row followed by its derived rows
//! (statuses, postal info, nameservers, DS records, transfers, addresses),
//! bumping the table's counter after every successful write. Fields are
//! whitespace normalized on the way out.

use std::collections::HashSet;

use tracing::info;

use crate::counters::Counters;
use crate::error::Result;
use crate::normalize::{standardize, standardize_row};
use crate::objects::{
    push_street_padded, Contact, Domain, EppParams, Host, IdnTableReference, Nndn, Policy,
    Registrar,
};
use crate::tables::{RowSink, Table};

/// Number of leading fields in a registrar postal info row at which street
/// padding stops (id, type, up to three streets).
const REGISTRAR_STREET_THRESHOLD: usize = 4;

/// Same for contact postal info rows (id, type, name, org, up to three streets).
const CONTACT_STREET_THRESHOLD: usize = 6;

/// Contact ids referenced by domains, deduplicated in first-seen order.
#[derive(Debug, Clone, Default)]
pub struct UniqueContactIds {
    seen: HashSet<String>,
    order: Vec<String>,
}

impl UniqueContactIds {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an id. Returns true if it had not been seen before.
    pub fn insert(&mut self, id: &str) -> bool {
        if self.seen.contains(id) {
            return false;
        }
        self.seen.insert(id.to_string());
        self.order.push(id.to_string());
        true
    }

    /// Number of distinct ids.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Returns true if no id was recorded.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Ids in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }
}

/// Turns decoded objects into rows on a [`RowSink`].
pub struct Flattener<S> {
    sink: S,
    counters: Counters,
    contact_ids: UniqueContactIds,
}

impl<S: RowSink> Flattener<S> {
    /// Creates a flattener writing to `sink`, with all counters at zero.
    pub fn new(sink: S) -> Self {
        Self {
            sink,
            counters: Counters::new(),
            contact_ids: UniqueContactIds::new(),
        }
    }

    /// Counters accumulated so far.
    pub fn counters(&self) -> &Counters {
        &self.counters
    }

    /// Mutable access to the sink, e.g. to close it.
    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    /// Consumes the flattener, returning the sink and the counters.
    pub fn into_parts(self) -> (S, Counters) {
        (self.sink, self.counters)
    }

    fn write(&mut self, table: Table, mut row: Vec<String>) -> Result<()> {
        standardize_row(&mut row);
        self.sink.write_row(table, &row)
    }

    fn emit(&mut self, table: Table, row: Vec<String>) -> Result<()> {
        self.write(table, row)?;
        self.counters.increment(table);
        Ok(())
    }

    /// Registrar row plus one registrar postal info row per entry.
    pub fn registrar(&mut self, registrar: &Registrar) -> Result<()> {
        self.emit(
            Table::Registrar,
            vec![
                registrar.id.clone(),
                registrar.name.clone(),
                registrar.gurid.to_string(),
                registrar.status.clone(),
                registrar.whois_info.url.clone(),
                registrar.url.clone(),
                registrar.created.clone(),
                registrar.updated.clone(),
                registrar.voice.clone(),
                registrar.fax.clone(),
                registrar.email.clone(),
            ],
        )?;

        for info in &registrar.postal_info {
            let mut row = vec![registrar.id.clone(), info.postal_type.clone()];
            push_street_padded(&mut row, &info.address, REGISTRAR_STREET_THRESHOLD);
            self.emit(Table::RegistrarPostalInfo, row)?;
        }
        Ok(())
    }

    /// Contact row, status rows and postal info rows.
    pub fn contact(&mut self, contact: &Contact) -> Result<()> {
        self.emit(
            Table::Contact,
            vec![
                contact.id.clone(),
                contact.roid.clone(),
                contact.voice.clone(),
                contact.fax.clone(),
                contact.email.clone(),
                contact.client_id.clone(),
                contact.creator.clone(),
                contact.created.clone(),
                contact.updater.clone(),
                contact.updated.clone(),
            ],
        )?;

        for status in &contact.statuses {
            self.emit(Table::ContactStatus, vec![contact.id.clone(), status.clone()])?;
        }

        for info in &contact.postal_info {
            let mut row = vec![
                contact.id.clone(),
                info.postal_type.clone(),
                info.name.clone(),
                info.org.clone(),
            ];
            push_street_padded(&mut row, &info.address, CONTACT_STREET_THRESHOLD);
            self.emit(Table::ContactPostalInfo, row)?;
        }
        Ok(())
    }

    /// Domain row, then contact ids, statuses, nameservers, DS records and
    /// the transfer row when a transfer state is present.
    pub fn domain(&mut self, domain: &Domain) -> Result<()> {
        self.emit(
            Table::Domain,
            vec![
                domain.name.clone(),
                domain.roid.clone(),
                domain.uname.clone(),
                domain.idn_table_id.clone(),
                domain.original_name.clone(),
                domain.registrant.clone(),
                domain.client_id.clone(),
                domain.creator.clone(),
                domain.created.clone(),
                domain.expires.clone(),
                domain.updater.clone(),
                domain.updated.clone(),
            ],
        )?;

        // Rows for these go out in `finish`.
        for contact in &domain.contacts {
            if self.contact_ids.insert(&standardize(&contact.id)) {
                self.counters.increment(Table::UniqueContactId);
            }
        }

        for status in &domain.statuses {
            self.emit(Table::DomainStatus, vec![domain.name.clone(), status.clone()])?;
        }

        for host in domain.nameservers.iter().flatten() {
            self.emit(
                Table::DomainNameservers,
                vec![domain.name.clone(), host.clone()],
            )?;
        }

        for ds in &domain.ds_data {
            self.emit(
                Table::DomainDnssec,
                vec![
                    domain.name.clone(),
                    ds.key_tag.to_string(),
                    ds.alg.to_string(),
                    ds.digest_type.to_string(),
                    ds.digest.clone(),
                ],
            )?;
        }

        if let Some(transfer) = domain.active_transfer() {
            // The requesting registrar fills the accepting id column as well.
            self.emit(
                Table::DomainTransfers,
                vec![
                    domain.name.clone(),
                    transfer.state.clone(),
                    transfer.requesting_registrar.clone(),
                    transfer.request_date.clone(),
                    transfer.requesting_registrar.clone(),
                    transfer.accept_date.clone(),
                    transfer.expiry_date.clone(),
                ],
            )?;
        }
        Ok(())
    }

    /// Host row, status rows and address rows.
    pub fn host(&mut self, host: &Host) -> Result<()> {
        self.emit(
            Table::Host,
            vec![
                host.name.clone(),
                host.roid.clone(),
                host.client_id.clone(),
                host.creator.clone(),
                host.created.clone(),
                host.updater.clone(),
                host.updated.clone(),
            ],
        )?;

        for status in &host.statuses {
            self.emit(Table::HostStatus, vec![host.name.clone(), status.clone()])?;
        }

        for addr in &host.addresses {
            self.emit(
                Table::HostAddress,
                vec![host.name.clone(), addr.address.clone(), addr.address.clone()],
            )?;
        }
        Ok(())
    }

    /// One IDN language row.
    pub fn idn_table_ref(&mut self, idn: &IdnTableReference) -> Result<()> {
        self.emit(
            Table::IdnLanguage,
            vec![idn.id.clone(), idn.url.clone(), idn.url_policy.clone()],
        )
    }

    /// One NNDN row.
    pub fn nndn(&mut self, nndn: &Nndn) -> Result<()> {
        self.emit(
            Table::Nndn,
            vec![
                nndn.aname.clone(),
                nndn.uname.clone(),
                nndn.idn_table_id.clone(),
                nndn.original_name.clone(),
                nndn.name_state.clone(),
                nndn.created.clone(),
            ],
        )
    }

    /// One EPP parameters row.
    pub fn epp_params(&mut self, params: &EppParams) -> Result<()> {
        self.emit(
            Table::EppParams,
            vec![params.version.clone(), params.lang.clone(), params.uri_list()],
        )
    }

    /// One policy row.
    pub fn policy(&mut self, policy: &Policy) -> Result<()> {
        self.emit(Table::Policy, vec![policy.scope.clone(), policy.element.clone()])
    }

    /// Writes the unique contact id rows. Call once, after the last object.
    ///
    /// The counter was already bumped as each id was first seen.
    pub fn finish(&mut self) -> Result<()> {
        let ids: Vec<String> = self.contact_ids.iter().map(str::to_string).collect();
        info!(count = ids.len(), "writing unique contact ids");
        for id in ids {
            self.write(Table::UniqueContactId, vec![id])?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::objects::{
        Address, DomainContact, DsData, HostAddress, PostalInfo, TransferData, WhoisInfo,
    };
    use pretty_assertions::assert_eq;

    type MemorySink = Vec<(Table, Vec<String>)>;

    fn rows(sink: &MemorySink, table: Table) -> Vec<Vec<String>> {
        sink.iter()
            .filter(|(t, _)| *t == table)
            .map(|(_, row)| row.clone())
            .collect()
    }

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    fn domain() -> Domain {
        Domain {
            name: "example.example".to_string(),
            roid: "Dexample1-TEST".to_string(),
            statuses: strings(&["clientUpdateProhibited", "ok"]),
            registrant: "jd1234".to_string(),
            contacts: vec![
                DomainContact {
                    contact_type: "admin".to_string(),
                    id: "sh8013".to_string(),
                },
                DomainContact {
                    contact_type: "tech".to_string(),
                    id: "sh8013".to_string(),
                },
            ],
            nameservers: vec![
                strings(&["ns1.example.com", "ns1.example1.example"]),
                strings(&["ns2.example.com"]),
            ],
            client_id: "RegistrarX".to_string(),
            creator: "RegistrarX".to_string(),
            created: "1999-04-03T22:00:00.0Z".to_string(),
            expires: "2025-04-03T22:00:00.0Z".to_string(),
            ..Domain::default()
        }
    }

    #[test]
    fn test_unique_contact_ids_first_seen() {
        let mut ids = UniqueContactIds::new();
        assert!(ids.insert("sh8013"));
        assert!(ids.insert("jd1234"));
        assert!(!ids.insert("sh8013"));
        assert_eq!(ids.len(), 2);
        assert_eq!(ids.iter().collect::<Vec<_>>(), vec!["sh8013", "jd1234"]);
    }

    #[test]
    fn test_domain_rows() {
        let mut flattener = Flattener::new(MemorySink::new());
        flattener.domain(&domain()).unwrap();
        let counters = *flattener.counters();
        let (sink, _) = flattener.into_parts();

        let domains = rows(&sink, Table::Domain);
        assert_eq!(domains.len(), 1);
        assert_eq!(domains[0].len(), Table::Domain.width());
        assert_eq!(domains[0][0], "example.example");
        assert_eq!(domains[0][5], "jd1234");
        assert_eq!(domains[0][9], "2025-04-03T22:00:00.0Z");

        assert_eq!(
            rows(&sink, Table::DomainStatus),
            vec![
                strings(&["example.example", "clientUpdateProhibited"]),
                strings(&["example.example", "ok"]),
            ]
        );
        assert_eq!(counters.get(Table::DomainStatus), 2);
        assert_eq!(counters.get(Table::UniqueContactId), 1);
        assert!(rows(&sink, Table::DomainTransfers).is_empty());
        assert!(rows(&sink, Table::DomainDnssec).is_empty());
    }

    #[test]
    fn test_nameserver_rows_exclude_domain_name() {
        let mut flattener = Flattener::new(MemorySink::new());
        flattener.domain(&domain()).unwrap();
        assert_eq!(flattener.counters().get(Table::DomainNameservers), 3);
        let (sink, _) = flattener.into_parts();
        let ns = rows(&sink, Table::DomainNameservers);
        assert_eq!(
            ns,
            vec![
                strings(&["example.example", "ns1.example.com"]),
                strings(&["example.example", "ns1.example1.example"]),
                strings(&["example.example", "ns2.example.com"]),
            ]
        );
        assert!(ns.iter().all(|row| row[1] != "example.example"));
    }

    #[test]
    fn test_no_nameservers_no_rows() {
        let mut flattener = Flattener::new(MemorySink::new());
        let mut d = domain();
        d.nameservers.clear();
        flattener.domain(&d).unwrap();
        assert_eq!(flattener.counters().get(Table::DomainNameservers), 0);
    }

    #[test]
    fn test_dnssec_and_transfer_rows() {
        let mut d = domain();
        d.ds_data = vec![DsData {
            key_tag: 12345,
            alg: 3,
            digest_type: 1,
            digest: "49FD46E6C4B45C55D4AC".to_string(),
        }];
        d.transfer = Some(TransferData {
            state: "pending".to_string(),
            requesting_registrar: "RegistrarX".to_string(),
            ..TransferData::default()
        });

        let mut flattener = Flattener::new(MemorySink::new());
        flattener.domain(&d).unwrap();
        let (sink, counters) = flattener.into_parts();

        assert_eq!(
            rows(&sink, Table::DomainDnssec),
            vec![strings(&["example.example", "12345", "3", "1", "49FD46E6C4B45C55D4AC"])]
        );

        let transfers = rows(&sink, Table::DomainTransfers);
        assert_eq!(transfers.len(), 1);
        assert_eq!(transfers[0].len(), Table::DomainTransfers.width());
        assert_eq!(transfers[0][1], "pending");
        assert_eq!(transfers[0][2], "RegistrarX");
        assert_eq!(transfers[0][4], "RegistrarX");
        assert_eq!(counters.get(Table::DomainTransfers), 1);
    }

    #[test]
    fn test_blank_transfer_state_writes_nothing() {
        let mut d = domain();
        d.transfer = Some(TransferData {
            state: "  ".to_string(),
            requesting_registrar: "RegistrarX".to_string(),
            ..TransferData::default()
        });
        let mut flattener = Flattener::new(MemorySink::new());
        flattener.domain(&d).unwrap();
        assert_eq!(flattener.counters().get(Table::DomainTransfers), 0);
    }

    #[test]
    fn test_host_rows() {
        let host = Host {
            name: "ns1.example.example".to_string(),
            roid: "Hns1_example_test-TEST".to_string(),
            statuses: strings(&["ok", "linked"]),
            addresses: vec![
                HostAddress {
                    version: "v4".to_string(),
                    address: "192.0.2.2".to_string(),
                },
                HostAddress {
                    version: "v6".to_string(),
                    address: "1080:0:0:0:8:800:200C:417A".to_string(),
                },
            ],
            ..Host::default()
        };

        let mut flattener = Flattener::new(MemorySink::new());
        flattener.host(&host).unwrap();
        let (sink, counters) = flattener.into_parts();

        assert_eq!(counters.get(Table::Host), 1);
        assert_eq!(counters.get(Table::HostStatus), 2);
        assert_eq!(
            rows(&sink, Table::HostAddress),
            vec![
                strings(&["ns1.example.example", "192.0.2.2", "192.0.2.2"]),
                strings(&[
                    "ns1.example.example",
                    "1080:0:0:0:8:800:200C:417A",
                    "1080:0:0:0:8:800:200C:417A"
                ]),
            ]
        );
    }

    #[test]
    fn test_contact_rows() {
        let contact = Contact {
            id: "sh8013".to_string(),
            roid: "Csh8013-TEST".to_string(),
            statuses: strings(&["linked", "clientDeleteProhibited", "ok"]),
            postal_info: vec![PostalInfo {
                postal_type: "int".to_string(),
                name: "John   Doe".to_string(),
                org: "Example Inc.".to_string(),
                address: Address {
                    street: strings(&["123 Example Dr.", "Suite 100"]),
                    city: "Dulles".to_string(),
                    state_province: "VA".to_string(),
                    postal_code: "20166-6503".to_string(),
                    country_code: "US".to_string(),
                },
            }],
            voice: "+1.7035555555".to_string(),
            email: "jdoe@example.example".to_string(),
            ..Contact::default()
        };

        let mut flattener = Flattener::new(MemorySink::new());
        flattener.contact(&contact).unwrap();
        let (sink, counters) = flattener.into_parts();

        assert_eq!(counters.get(Table::ContactStatus), 3);
        let statuses: Vec<String> = rows(&sink, Table::ContactStatus)
            .into_iter()
            .map(|row| row[1].clone())
            .collect();
        assert_eq!(statuses, strings(&["linked", "clientDeleteProhibited", "ok"]));

        assert_eq!(
            rows(&sink, Table::ContactPostalInfo),
            vec![strings(&[
                "sh8013",
                "int",
                "John Doe",
                "Example Inc.",
                "123 Example Dr.",
                "Suite 100",
                "",
                "Dulles",
                "VA",
                "20166-6503",
                "US"
            ])]
        );
    }

    #[test]
    fn test_registrar_rows() {
        let registrar = Registrar {
            id: "RegistrarX".to_string(),
            name: "Registrar X".to_string(),
            gurid: 8,
            status: "ok".to_string(),
            postal_info: vec![PostalInfo {
                postal_type: "int".to_string(),
                address: Address {
                    street: strings(&["123 Example Dr."]),
                    city: "Dulles".to_string(),
                    ..Address::default()
                },
                ..PostalInfo::default()
            }],
            url: "http://www.example.example".to_string(),
            whois_info: WhoisInfo {
                name: "whois.example.example".to_string(),
                url: "http://whois.example.example".to_string(),
            },
            ..Registrar::default()
        };

        let mut flattener = Flattener::new(MemorySink::new());
        flattener.registrar(&registrar).unwrap();
        let (sink, _) = flattener.into_parts();

        let main = rows(&sink, Table::Registrar);
        assert_eq!(main[0].len(), Table::Registrar.width());
        assert_eq!(main[0][2], "8");
        assert_eq!(main[0][4], "http://whois.example.example");
        assert_eq!(main[0][5], "http://www.example.example");

        let postal = rows(&sink, Table::RegistrarPostalInfo);
        assert_eq!(postal[0].len(), Table::RegistrarPostalInfo.width());
        assert_eq!(
            postal[0][2..6].to_vec(),
            strings(&["123 Example Dr.", "", "", "Dulles"])
        );
    }

    #[test]
    fn test_single_row_objects() {
        let mut flattener = Flattener::new(MemorySink::new());
        flattener
            .idn_table_ref(&IdnTableReference {
                id: "pt-BR".to_string(),
                url: "http://example.example/pt-BR_1.1.txt".to_string(),
                url_policy: "http://registro.br/dominio/regras.html".to_string(),
            })
            .unwrap();
        flattener
            .nndn(&Nndn {
                aname: "xn--exampl-gva.example".to_string(),
                name_state: "withheld".to_string(),
                ..Nndn::default()
            })
            .unwrap();
        flattener
            .epp_params(&EppParams {
                version: "1.0".to_string(),
                lang: "en".to_string(),
                obj_uris: strings(&["urn:ietf:params:xml:ns:domain-1.0"]),
                ext_uris: strings(&["urn:ietf:params:xml:ns:rgp-1.0"]),
            })
            .unwrap();
        flattener
            .policy(&Policy {
                scope: "//rde:deposit/rde:contents/rdeDomain:domain".to_string(),
                element: "rdeDomain:registrant".to_string(),
            })
            .unwrap();
        let (sink, counters) = flattener.into_parts();

        for table in [Table::IdnLanguage, Table::Nndn, Table::EppParams, Table::Policy] {
            assert_eq!(counters.get(table), 1);
            let written = rows(&sink, table);
            assert_eq!(written.len(), 1);
            assert_eq!(written[0].len(), table.width());
        }
        assert_eq!(
            rows(&sink, Table::EppParams)[0][2],
            "urn:ietf:params:xml:ns:domain-1.0 urn:ietf:params:xml:ns:rgp-1.0"
        );
    }

    #[test]
    fn test_finish_flushes_unique_contacts_once() {
        let mut flattener = Flattener::new(MemorySink::new());
        let mut second = domain();
        second.name = "example2.example".to_string();
        second.contacts.push(DomainContact {
            contact_type: "billing".to_string(),
            id: "jd1234".to_string(),
        });
        flattener.domain(&domain()).unwrap();
        flattener.domain(&second).unwrap();
        flattener.finish().unwrap();
        let (sink, counters) = flattener.into_parts();

        assert_eq!(
            rows(&sink, Table::UniqueContactId),
            vec![strings(&["sh8013"]), strings(&["jd1234"])]
        );
        assert_eq!(counters.get(Table::UniqueContactId), 2);
    }

    #[test]
    fn test_unique_contacts_compare_normalized_ids() {
        let mut flattener = Flattener::new(MemorySink::new());
        let mut first = domain();
        first.contacts = vec![DomainContact {
            contact_type: "admin".to_string(),
            id: "sh 8013".to_string(),
        }];
        let mut second = first.clone();
        second.name = "example2.example".to_string();
        second.contacts[0].id = "\n  sh  8013\t".to_string();
        flattener.domain(&first).unwrap();
        flattener.domain(&second).unwrap();
        flattener.finish().unwrap();
        let (sink, counters) = flattener.into_parts();

        assert_eq!(rows(&sink, Table::UniqueContactId), vec![strings(&["sh 8013"])]);
        assert_eq!(counters.get(Table::UniqueContactId), 1);
    }
}
