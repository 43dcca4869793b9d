// firewall internet-service-definition and its sub-tables

use crate::resource::{KeySpec, ParentKey, ResourceDef};
use crate::schema::Field;

const DEFINITION_PATH: &str =
    "/pm/config/device/{device}/vdom/{vdom}/firewall/internet-service-definition";

static PORT_RANGE_FIELDS: &[Field] = &[
    Field::fosid(),
    Field::integer("start_port"),
    Field::integer("end_port"),
];

static ENTRY_FIELDS: &[Field] = &[
    Field::integer("seq_num"),
    Field::integer("category_id"),
    Field::string("name"),
    Field::integer("protocol"),
    Field::block("port_range", PORT_RANGE_FIELDS).keyed("fosid"),
];

static DEFINITION_FIELDS: &[Field] = &[
    Field::fosid(),
    Field::block("entry", ENTRY_FIELDS).keyed("seq_num"),
];

pub static INTERNET_SERVICE_DEFINITION: ResourceDef = ResourceDef {
    type_name: "fmgdevice_firewall_internet_service_definition",
    label: "FirewallInternetServiceDefinition",
    path: DEFINITION_PATH,
    key: KeySpec::Field("fosid"),
    parents: &[],
    fields: DEFINITION_FIELDS,
};

pub static INTERNET_SERVICE_DEFINITION_ENTRY: ResourceDef = ResourceDef {
    type_name: "fmgdevice_firewall_internet_service_definition_entry",
    label: "FirewallInternetServiceDefinitionEntry",
    path: "/pm/config/device/{device}/vdom/{vdom}/firewall/internet-service-definition/{internet-service-definition}/entry",
    key: KeySpec::Field("seq_num"),
    parents: &[ParentKey {
        attr: "internet_service_definition",
        placeholder: "internet-service-definition",
    }],
    fields: ENTRY_FIELDS,
};

pub static INTERNET_SERVICE_DEFINITION_ENTRY_PORT_RANGE: ResourceDef = ResourceDef {
    type_name: "fmgdevice_firewall_internet_service_definition_entry_port_range",
    label: "FirewallInternetServiceDefinitionEntryPortRange",
    path: "/pm/config/device/{device}/vdom/{vdom}/firewall/internet-service-definition/{internet-service-definition}/entry/{entry}/port-range",
    key: KeySpec::Field("fosid"),
    parents: &[
        ParentKey {
            attr: "internet_service_definition",
            placeholder: "internet-service-definition",
        },
        ParentKey {
            attr: "entry",
            placeholder: "entry",
        },
    ],
    fields: PORT_RANGE_FIELDS,
};
