// router bfd, router bfd neighbor, router static

use crate::resource::{KeySpec, ResourceDef};
use crate::schema::Field;

static BFD_NEIGHBOR_FIELDS: &[Field] = &[Field::string("ip"), Field::string("interface")];

static BFD_MULTIHOP_TEMPLATE_FIELDS: &[Field] = &[
    Field::fosid(),
    Field::ipmask("src"),
    Field::ipmask("dst"),
    Field::integer("bfd_desired_min_tx"),
    Field::integer("bfd_required_min_rx"),
    Field::integer("bfd_detect_mult"),
    Field::string("auth_mode"),
    Field::string_set("md5_key").sensitive(),
];

static BFD_FIELDS: &[Field] = &[
    Field::block("neighbor", BFD_NEIGHBOR_FIELDS).keyed("ip"),
    Field::block("multihop_template", BFD_MULTIHOP_TEMPLATE_FIELDS).keyed("fosid"),
];

pub static BFD: ResourceDef = ResourceDef {
    type_name: "fmgdevice_router_bfd",
    label: "RouterBfd",
    path: "/pm/config/device/{device}/vdom/{vdom}/router/bfd",
    key: KeySpec::Singleton,
    parents: &[],
    fields: BFD_FIELDS,
};

pub static BFD_NEIGHBOR: ResourceDef = ResourceDef {
    type_name: "fmgdevice_router_bfd_neighbor",
    label: "RouterBfdNeighbor",
    path: "/pm/config/device/{device}/vdom/{vdom}/router/bfd/neighbor",
    key: KeySpec::Field("ip"),
    parents: &[],
    fields: BFD_NEIGHBOR_FIELDS,
};

static STATIC_FIELDS: &[Field] = &[
    Field::integer("seq_num"),
    Field::string("status"),
    Field::ipmask("dst"),
    Field::ipmask("src"),
    Field::string("gateway"),
    Field::integer("distance"),
    Field::integer("weight"),
    Field::integer("priority"),
    Field::string_set("device"),
    Field::string("comment"),
    Field::string("blackhole"),
    Field::string("dynamic_gateway"),
    Field::string_set("sdwan_zone"),
    Field::string_set("dstaddr"),
    Field::string_set("internet_service"),
    Field::string("link_monitor_exempt"),
    Field::integer("vrf"),
    Field::string("bfd"),
];

pub static STATIC: ResourceDef = ResourceDef {
    type_name: "fmgdevice_router_static",
    label: "RouterStatic",
    path: "/pm/config/device/{device}/vdom/{vdom}/router/static",
    key: KeySpec::Field("seq_num"),
    parents: &[],
    fields: STATIC_FIELDS,
};

