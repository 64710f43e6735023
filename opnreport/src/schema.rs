//! Schema registry: which child tags each node type accepts and what they become.
//!
//! The tables are plain data consulted by the builder. Tags missing from a
//! table are dropped; documents from different product versions carry extra
//! sections and that is not an error.

use crate::scalar::ScalarKind;

/// Every node type the builder can instantiate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Scalar(ScalarKind),
    Composite(CompositeKind),
}

/// Node types with named children.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompositeKind {
    Document,
    Config,
    System,
    Interfaces,
    Interface,
    Vlans,
    Vlan,
    Bridges,
    Bridged,
    Gateways,
    GatewayItem,
    StaticRoutes,
    Route,
    Vendor,
    Firewall,
    FirewallAlias,
    Aliases,
    Alias,
    Nat,
    NatOutbound,
    NatOutboundRule,
    NatRule,
    Filter,
    FilterRule,
    RuleLocation,
    Change,
    DnsMasq,
    DnsMasqHost,
    DnsMasqHostAliases,
    DnsMasqHostAlias,
    DnsMasqDomainOverride,
    Dhcpd,
    DhcpdSlot,
    Range,
    StaticMap,
    OpenVpn,
    OpenVpnServer,
    OpenVpnClient,
    OpenVpnCsc,
    Syslog,
    SysCtl,
    SysCtlItem,
}

/// What a registered child tag turns into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    /// One leaf, converted from the element text.
    Scalar(ScalarKind),
    /// Repeated leaf, accumulated in document order.
    ScalarList(ScalarKind),
    /// One nested node; a repeated tag replaces the earlier one.
    Node(CompositeKind),
    /// Repeated nested node, accumulated in document order.
    NodeList(CompositeKind),
    /// Nested node with fixed slots plus an open-ended family of slots.
    Slots(CompositeKind),
}

impl Field {
    pub fn node_kind(self) -> NodeKind {
        match self {
            Field::Scalar(kind) | Field::ScalarList(kind) => NodeKind::Scalar(kind),
            Field::Node(kind) | Field::NodeList(kind) | Field::Slots(kind) => {
                NodeKind::Composite(kind)
            }
        }
    }

    pub fn is_list(self) -> bool {
        matches!(self, Field::ScalarList(_) | Field::NodeList(_))
    }
}

/// Child table of one composite node type.
#[derive(Debug)]
pub struct Schema {
    fields: &'static [(&'static str, Field)],
    family: Option<CompositeKind>,
}

impl Schema {
    const fn fixed(fields: &'static [(&'static str, Field)]) -> Self {
        Self {
            fields,
            family: None,
        }
    }

    const fn slots(fields: &'static [(&'static str, Field)], family: CompositeKind) -> Self {
        Self {
            fields,
            family: Some(family),
        }
    }

    /// Field for `tag`. Fixed names win; any other tag falls into the slot
    /// family when the schema declares one.
    pub fn field(&self, tag: &str) -> Option<Field> {
        self.fields
            .iter()
            .find(|(name, _)| *name == tag)
            .map(|(_, field)| *field)
            .or_else(|| self.family.map(Field::Node))
    }
}

const TEXT: Field = Field::Scalar(ScalarKind::Text);
const INT: Field = Field::Scalar(ScalarKind::Integer);
const TIME: Field = Field::Scalar(ScalarKind::Timestamp);
const FLAG: Field = Field::Scalar(ScalarKind::Flag);
const PORT: Field = Field::Scalar(ScalarKind::Port);
const ANY: Field = Field::Scalar(ScalarKind::Presence);
const ALIAS: Field = Field::Scalar(ScalarKind::AliasRef);
const IFACE: Field = Field::Scalar(ScalarKind::InterfaceRef);
const IFACES: Field = Field::Scalar(ScalarKind::InterfaceList);

static DOCUMENT: Schema = Schema::fixed(&[("opnsense", Field::Node(CompositeKind::Config))]);

static CONFIG: Schema = Schema::fixed(&[
    ("version", TEXT),
    ("system", Field::Node(CompositeKind::System)),
    ("interfaces", Field::Slots(CompositeKind::Interfaces)),
    ("vlans", Field::Node(CompositeKind::Vlans)),
    ("bridges", Field::Node(CompositeKind::Bridges)),
    ("gateways", Field::Node(CompositeKind::Gateways)),
    ("staticroutes", Field::Node(CompositeKind::StaticRoutes)),
    ("OPNsense", Field::Node(CompositeKind::Vendor)),
    ("nat", Field::Node(CompositeKind::Nat)),
    ("filter", Field::Node(CompositeKind::Filter)),
    ("dnsmasq", Field::Node(CompositeKind::DnsMasq)),
    ("dhcpd", Field::Slots(CompositeKind::Dhcpd)),
    ("openvpn", Field::Node(CompositeKind::OpenVpn)),
    ("syslog", Field::Node(CompositeKind::Syslog)),
    ("sysctl", Field::Node(CompositeKind::SysCtl)),
]);

static SYSTEM: Schema = Schema::fixed(&[
    ("optimization", TEXT),
    ("hostname", TEXT),
    ("domain", TEXT),
    ("timeservers", TEXT),
    ("timezone", TEXT),
    ("language", TEXT),
    ("dnsserver", Field::ScalarList(ScalarKind::Text)),
]);

static INTERFACES: Schema = Schema::slots(
    &[
        ("wan", Field::Node(CompositeKind::Interface)),
        ("lan", Field::Node(CompositeKind::Interface)),
    ],
    CompositeKind::Interface,
);

static INTERFACE: Schema = Schema::fixed(&[
    ("if", TEXT),
    ("descr", TEXT),
    ("ipaddr", TEXT),
    ("subnet", TEXT),
    ("enable", FLAG),
]);

static VLANS: Schema = Schema::fixed(&[("vlan", Field::NodeList(CompositeKind::Vlan))]);

static VLAN: Schema = Schema::fixed(&[
    ("vlanif", TEXT),
    ("tag", INT),
    ("if", TEXT),
    ("descr", TEXT),
]);

static BRIDGES: Schema = Schema::fixed(&[("bridged", Field::NodeList(CompositeKind::Bridged))]);

static BRIDGED: Schema = Schema::fixed(&[
    ("bridgeif", TEXT),
    ("members", IFACES),
    ("descr", TEXT),
]);

static GATEWAYS: Schema =
    Schema::fixed(&[("gateway_item", Field::NodeList(CompositeKind::GatewayItem))]);

static GATEWAY_ITEM: Schema = Schema::fixed(&[
    ("interface", IFACES),
    ("gateway", TEXT),
    ("name", TEXT),
    ("weight", INT),
    ("ipprotocol", TEXT),
    ("interval", INT),
    ("alert_interval", INT),
    ("descr", TEXT),
    ("defaultgw", FLAG),
]);

static STATIC_ROUTES: Schema = Schema::fixed(&[("route", Field::NodeList(CompositeKind::Route))]);

static ROUTE: Schema = Schema::fixed(&[
    ("network", TEXT),
    ("gateway", TEXT),
    ("descr", TEXT),
    ("disabled", FLAG),
]);

static VENDOR: Schema = Schema::fixed(&[("Firewall", Field::Node(CompositeKind::Firewall))]);

static FIREWALL: Schema = Schema::fixed(&[("Alias", Field::Node(CompositeKind::FirewallAlias))]);

static FIREWALL_ALIAS: Schema = Schema::fixed(&[("aliases", Field::Node(CompositeKind::Aliases))]);

static ALIASES: Schema = Schema::fixed(&[("alias", Field::NodeList(CompositeKind::Alias))]);

static ALIAS_ENTRY: Schema = Schema::fixed(&[
    ("name", TEXT),
    ("type", TEXT),
    ("address", TEXT),
    ("content", TEXT),
    ("descr", TEXT),
    ("detail", TEXT),
]);

static NAT: Schema = Schema::fixed(&[
    ("outbound", Field::Node(CompositeKind::NatOutbound)),
    ("rule", Field::NodeList(CompositeKind::NatRule)),
]);

static NAT_OUTBOUND: Schema = Schema::fixed(&[
    ("mode", TEXT),
    ("rule", Field::NodeList(CompositeKind::NatOutboundRule)),
]);

static NAT_OUTBOUND_RULE: Schema = Schema::fixed(&[
    ("interface", IFACES),
    ("source", Field::Node(CompositeKind::RuleLocation)),
    ("destination", Field::Node(CompositeKind::RuleLocation)),
    ("dstport", PORT),
    ("protocol", TEXT),
    ("target", TEXT),
    ("targetip", TEXT),
    ("targetip_subnet", TEXT),
    ("natport", PORT),
    ("staticnatport", PORT),
    ("descr", TEXT),
    ("created", Field::Node(CompositeKind::Change)),
    ("updated", Field::Node(CompositeKind::Change)),
    ("disabled", FLAG),
]);

static NAT_RULE: Schema = Schema::fixed(&[
    ("source", Field::Node(CompositeKind::RuleLocation)),
    ("destination", Field::Node(CompositeKind::RuleLocation)),
    ("protocol", TEXT),
    ("target", IFACE),
    ("local-port", PORT),
    ("interface", IFACES),
    ("descr", TEXT),
    ("associated-rule-id", TEXT),
    ("created", Field::Node(CompositeKind::Change)),
    ("updated", Field::Node(CompositeKind::Change)),
    ("disabled", FLAG),
]);

static FILTER: Schema = Schema::fixed(&[("rule", Field::NodeList(CompositeKind::FilterRule))]);

static FILTER_RULE: Schema = Schema::fixed(&[
    ("id", TEXT),
    ("tracker", TEXT),
    ("type", TEXT),
    ("interface", IFACES),
    ("ipprotocol", TEXT),
    ("tag", TEXT),
    ("tagged", TEXT),
    ("max", TEXT),
    ("max-src-nodes", TEXT),
    ("max-src-conn", TEXT),
    ("max-src-states", TEXT),
    ("statetimeout", TEXT),
    ("statetype", TEXT),
    ("os", TEXT),
    ("protocol", TEXT),
    ("source", Field::Node(CompositeKind::RuleLocation)),
    ("destination", Field::Node(CompositeKind::RuleLocation)),
    ("descr", TEXT),
    ("associated-rule-id", TEXT),
    ("created", Field::Node(CompositeKind::Change)),
    ("updated", Field::Node(CompositeKind::Change)),
    ("disabled", FLAG),
]);

static RULE_LOCATION: Schema = Schema::fixed(&[
    ("any", ANY),
    ("network", ALIAS),
    ("address", ALIAS),
    ("port", PORT),
    ("not", FLAG),
]);

static CHANGE: Schema = Schema::fixed(&[("time", TIME), ("username", TEXT)]);

static DNSMASQ: Schema = Schema::fixed(&[
    ("enable", FLAG),
    ("reqdhcp", FLAG),
    ("reqdhcpstatic", FLAG),
    ("strict_order", FLAG),
    ("custom_options", TEXT),
    ("interface", IFACES),
    ("hosts", Field::NodeList(CompositeKind::DnsMasqHost)),
    ("domainoverrides", Field::NodeList(CompositeKind::DnsMasqDomainOverride)),
]);

static DNSMASQ_HOST: Schema = Schema::fixed(&[
    ("host", TEXT),
    ("domain", TEXT),
    ("ip", TEXT),
    ("descr", TEXT),
    ("aliases", Field::Node(CompositeKind::DnsMasqHostAliases)),
]);

static DNSMASQ_HOST_ALIASES: Schema =
    Schema::fixed(&[("item", Field::NodeList(CompositeKind::DnsMasqHostAlias))]);

static DNSMASQ_HOST_ALIAS: Schema = Schema::fixed(&[
    ("host", TEXT),
    ("domain", TEXT),
    ("description", TEXT),
]);

static DNSMASQ_DOMAIN_OVERRIDE: Schema = Schema::fixed(&[
    ("domain", TEXT),
    ("ip", TEXT),
    ("idx", INT),
    ("descr", TEXT),
]);

static DHCPD: Schema = Schema::slots(
    &[
        ("wan", Field::Node(CompositeKind::DhcpdSlot)),
        ("lan", Field::Node(CompositeKind::DhcpdSlot)),
    ],
    CompositeKind::DhcpdSlot,
);

static DHCPD_SLOT: Schema = Schema::fixed(&[
    ("range", Field::NodeList(CompositeKind::Range)),
    ("staticmap", Field::NodeList(CompositeKind::StaticMap)),
    ("defaultleasetime", INT),
    ("maxleasetime", INT),
    ("enable", FLAG),
]);

static RANGE: Schema = Schema::fixed(&[("from", TEXT), ("to", TEXT)]);

static STATIC_MAP: Schema = Schema::fixed(&[("mac", TEXT), ("ipaddr", TEXT), ("hostname", TEXT)]);

static OPENVPN: Schema = Schema::fixed(&[
    ("openvpn-server", Field::NodeList(CompositeKind::OpenVpnServer)),
    ("openvpn-client", Field::NodeList(CompositeKind::OpenVpnClient)),
    ("openvpn-csc", Field::NodeList(CompositeKind::OpenVpnCsc)),
]);

static OPENVPN_SERVER: Schema = Schema::fixed(&[
    ("vpnid", INT),
    ("mode", TEXT),
    ("authmode", TEXT),
    ("protocol", TEXT),
    ("dev_mode", TEXT),
    ("interface", IFACES),
    ("ipaddr", TEXT),
    ("local_port", INT),
    ("crypto", TEXT),
    ("digest", TEXT),
    ("tunnel_network", TEXT),
    ("remote_network", TEXT),
    ("local_network", TEXT),
    ("dynamic_ip", TEXT),
    ("pool_enable", TEXT),
    ("topology", TEXT),
    ("description", TEXT),
    ("custom_options", TEXT),
]);

static OPENVPN_CLIENT: Schema = Schema::fixed(&[
    ("vpnid", INT),
    ("auth_user", TEXT),
    ("mode", TEXT),
    ("protocol", TEXT),
    ("dev_mode", TEXT),
    ("interface", IFACES),
    ("ipaddr", TEXT),
    ("local_port", INT),
    ("server_addr", TEXT),
    ("server_port", INT),
    ("crypto", TEXT),
    ("digest", TEXT),
    ("tunnel_network", TEXT),
    ("remote_network", TEXT),
    ("local_network", TEXT),
    ("topology", TEXT),
    ("description", TEXT),
    ("custom_options", TEXT),
]);

static OPENVPN_CSC: Schema = Schema::fixed(&[
    ("server_list", TEXT),
    ("common_name", TEXT),
    ("description", TEXT),
    ("tunnel_network", TEXT),
]);

static SYSLOG: Schema = Schema::fixed(&[
    ("nentries", INT),
    ("logfilesize", INT),
    ("remoteserver", TEXT),
    ("remoteserver2", TEXT),
    ("remoteserver3", TEXT),
    ("sourceip", IFACES),
    ("ipproto", TEXT),
    ("logall", FLAG),
    ("enable", FLAG),
]);

static SYSCTL: Schema = Schema::fixed(&[("item", Field::NodeList(CompositeKind::SysCtlItem))]);

static SYSCTL_ITEM: Schema = Schema::fixed(&[("tunable", TEXT), ("value", TEXT), ("descr", TEXT)]);

impl CompositeKind {
    /// Registered child table for this node type.
    pub fn schema(self) -> &'static Schema {
        match self {
            CompositeKind::Document => &DOCUMENT,
            CompositeKind::Config => &CONFIG,
            CompositeKind::System => &SYSTEM,
            CompositeKind::Interfaces => &INTERFACES,
            CompositeKind::Interface => &INTERFACE,
            CompositeKind::Vlans => &VLANS,
            CompositeKind::Vlan => &VLAN,
            CompositeKind::Bridges => &BRIDGES,
            CompositeKind::Bridged => &BRIDGED,
            CompositeKind::Gateways => &GATEWAYS,
            CompositeKind::GatewayItem => &GATEWAY_ITEM,
            CompositeKind::StaticRoutes => &STATIC_ROUTES,
            CompositeKind::Route => &ROUTE,
            CompositeKind::Vendor => &VENDOR,
            CompositeKind::Firewall => &FIREWALL,
            CompositeKind::FirewallAlias => &FIREWALL_ALIAS,
            CompositeKind::Aliases => &ALIASES,
            CompositeKind::Alias => &ALIAS_ENTRY,
            CompositeKind::Nat => &NAT,
            CompositeKind::NatOutbound => &NAT_OUTBOUND,
            CompositeKind::NatOutboundRule => &NAT_OUTBOUND_RULE,
            CompositeKind::NatRule => &NAT_RULE,
            CompositeKind::Filter => &FILTER,
            CompositeKind::FilterRule => &FILTER_RULE,
            CompositeKind::RuleLocation => &RULE_LOCATION,
            CompositeKind::Change => &CHANGE,
            CompositeKind::DnsMasq => &DNSMASQ,
            CompositeKind::DnsMasqHost => &DNSMASQ_HOST,
            CompositeKind::DnsMasqHostAliases => &DNSMASQ_HOST_ALIASES,
            CompositeKind::DnsMasqHostAlias => &DNSMASQ_HOST_ALIAS,
            CompositeKind::DnsMasqDomainOverride => &DNSMASQ_DOMAIN_OVERRIDE,
            CompositeKind::Dhcpd => &DHCPD,
            CompositeKind::DhcpdSlot => &DHCPD_SLOT,
            CompositeKind::Range => &RANGE,
            CompositeKind::StaticMap => &STATIC_MAP,
            CompositeKind::OpenVpn => &OPENVPN,
            CompositeKind::OpenVpnServer => &OPENVPN_SERVER,
            CompositeKind::OpenVpnClient => &OPENVPN_CLIENT,
            CompositeKind::OpenVpnCsc => &OPENVPN_CSC,
            CompositeKind::Syslog => &SYSLOG,
            CompositeKind::SysCtl => &SYSCTL,
            CompositeKind::SysCtlItem => &SYSCTL_ITEM,
        }
    }
}
