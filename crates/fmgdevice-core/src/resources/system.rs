// system dns (device-global, no vdom segment)

use crate::resource::{KeySpec, ResourceDef};
use crate::schema::Field;

static DNS_FIELDS: &[Field] = &[
    Field::string("primary"),
    Field::string("secondary"),
    Field::string_set("protocol"),
    Field::string("dns_over_tls"),
    Field::string_set("ssl_certificate"),
    Field::string_set("server_hostname"),
    Field::string_set("domain"),
    Field::string("ip6_primary"),
    Field::string("ip6_secondary"),
    Field::integer("timeout"),
    Field::integer("retry"),
    Field::integer("dns_cache_limit"),
    Field::integer("dns_cache_ttl"),
    Field::string("cache_notfound_responses"),
    Field::string("source_ip"),
    Field::string("interface_select_method"),
    Field::string_set("interface"),
    Field::string("server_select_method"),
    Field::string("alt_primary"),
    Field::string("alt_secondary"),
    Field::string("log"),
    Field::string("fqdn_cache_ttl"),
    Field::string("fqdn_min_refresh"),
];

pub static DNS: ResourceDef = ResourceDef {
    type_name: "fmgdevice_system_dns",
    label: "SystemDns",
    path: "/pm/config/device/{device}/global/system/dns",
    key: KeySpec::Singleton,
    parents: &[],
    fields: DNS_FIELDS,
};
