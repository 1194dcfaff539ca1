//! Built-in powers, aliases and power groups.
//!
//! These seed a fresh database and top up an older one after load. Group
//! lists use the operator token syntax (`Name`, `Name:LTE`, `Name:2`);
//! tokens naming powers that are not registered are skipped when applied.

use divscope_domain::Comparator;

pub struct DefaultPower {
    pub name: &'static str,
    pub comparator: Comparator,
}

pub struct DefaultAlias {
    pub alias: &'static str,
    pub power: &'static str,
}

pub struct DefaultGroup {
    pub name: &'static str,
    pub ceiling: &'static str,
    pub auto: &'static str,
}

const fn power(name: &'static str, comparator: Comparator) -> DefaultPower {
    DefaultPower { name, comparator }
}

const fn alias(alias: &'static str, power: &'static str) -> DefaultAlias {
    DefaultAlias { alias, power }
}

use Comparator::{BuilderCreate, LevelCheck, LevelCheckLte, LevelSet, SelfOnly};

pub const POWERS: &[DefaultPower] = &[
    power("Announce", SelfOnly),
    power("Attach", LevelCheck),
    power("BCreate", BuilderCreate),
    power("Boot", LevelCheck),
    power("Builder", SelfOnly),
    power("Can_NsPemit", LevelCheck),
    power("Cemit", SelfOnly),
    power("Chat", SelfOnly),
    power("Chown", LevelCheck),
    power("Combat", LevelCheck),
    power("Cron", SelfOnly),
    power("DAnnounce", SelfOnly),
    power("Division", SelfOnly),
    power("EAnnounce", SelfOnly),
    power("Empire", SelfOnly),
    power("Empower", LevelCheckLte),
    power("GFuncs", SelfOnly),
    power("Halt", LevelCheck),
    power("Hide", SelfOnly),
    power("Idle", SelfOnly),
    power("Join", LevelCheck),
    power("Level", LevelSet),
    power("Link", LevelCheck),
    power("Login", SelfOnly),
    power("MailAdmin", LevelCheck),
    power("Many_Attribs", SelfOnly),
    power("Modify", LevelCheck),
    power("Newpass", LevelCheck),
    power("NoPay", SelfOnly),
    power("NoQuota", SelfOnly),
    power("Nuke", LevelCheck),
    power("Open", LevelCheck),
    power("Pass_Locks", LevelCheck),
    power("PCreate", SelfOnly),
    power("PEmit", LevelCheck),
    power("Poll", SelfOnly),
    power("Powergroup", LevelCheck),
    power("Privilege", SelfOnly),
    power("PrivWho", SelfOnly),
    power("Program", LevelCheck),
    power("ProgLock", LevelCheck),
    power("Pueblo_Send", SelfOnly),
    power("Quota", SelfOnly),
    power("Queue", SelfOnly),
    power("RCACHE", SelfOnly),
    power("Remote", LevelCheck),
    power("RPChat", SelfOnly),
    power("RPEmit", SelfOnly),
    power("RPTel", SelfOnly),
    power("Search", LevelCheck),
    power("See_All", LevelCheck),
    power("See_Queue", LevelCheck),
    power("SetQuotas", LevelCheck),
    power("Site", SelfOnly),
    power("SQL_Ok", SelfOnly),
    power("Summon", LevelCheck),
    power("@SU", LevelCheck),
    power("Tel_Thing", LevelCheck),
    power("Tel_Place", LevelCheck),
];

pub const ALIASES: &[DefaultAlias] = &[
    alias("Functions", "GFuncs"),
    alias("@Cemit", "Cemit"),
    alias("CQuota", "SetQuotas"),
    alias("chat_privs", "Chat"),
    alias("link_anywhere", "Link"),
    alias("long_fingers", "Remote"),
    alias("Pemit_All", "PEmit"),
    alias("Open_Anywhere", "Open"),
    alias("Tport_Anything", "Tel_Thing"),
    alias("Tel_Where", "Tel_Place"),
    alias("Tport_Anywhere", "Tel_Place"),
    alias("@wall", "Announce"),
    alias("wall", "Announce"),
];

pub const GROUPS: &[DefaultGroup] = &[
    DefaultGroup {
        name: "Wizard",
        ceiling: "Announce Attach BCreate Boot Builder Can_NsPemit Cemit Chat Chown Combat Cron \
                  DAnnounce Division EAnnounce Economy Empire Empower GFuncs Halt Hide Idle Join \
                  Level Link Login MailAdmin Many_Attribs Modify:LTE Newpass:LTE NoPay NoQuota \
                  Nuke:LTE Open Pass_Locks PCreate PEmit Poll Privilege PrivWho ProgLock Program \
                  Powergroup:lt Pueblo_Send Queue Quota RCACHE Remote RPChat RPEmit RPTel Search \
                  See_All See_Queue SetQuotas Site SQL_Ok Summon Tel_Place Tel_Thing @SU:LTE",
        auto: "Announce Attach BCreate Boot Builder Can_NsPemit Cemit Chat Chown Combat Cron \
               DAnnounce Division EAnnounce Empire Empower GFuncs Halt Hide Idle Join Level Link \
               Login MailAdmin Many_Attribs Modify:LTE Newpass:LTE NoPay NoQuota Nuke:LTE Open \
               PCreate PEmit Poll Powergroup:lt Privilege PrivWho ProgLock Program Pueblo_Send \
               Queue Quota RCACHE Remote RPChat RPEmit RPTel Search See_All See_Queue SetQuotas \
               Site SQL_Ok Summon Tel_Place Tel_Thing @SU:LTE",
    },
    DefaultGroup {
        name: "Royalty",
        ceiling: "See_All NoPay NoQuota Queue See_Queue Remote Chat Builder Announce Boot PrivWho \
                  Login PEmit Hide Privilege Tel_Place Tel_Thing",
        auto: "See_All NoPay NoQuota Queue See_Queue Remote Chat Builder Announce Boot PrivWho \
               Login PEmit Hide Privilege Tel_Place Tel_Thing",
    },
    DefaultGroup {
        name: "Director",
        ceiling: "@SU:LTE Announce Attach BCreate Boot Builder Can_NsPemit Cemit Chat Chown Combat \
                  Cron DAnnounce Division EAnnounce Empire Empower GFuncs Halt Hide Idle Join \
                  Level Link Login MailAdmin Many_Attribs Modify Newpass:2 NoPay NoQuota Nuke:LTE \
                  Open:2 Pass_Locks PCreate PEmit Poll PowerGroup:LTE Privilege PrivWho Program \
                  ProgLock:lte Pueblo_Send Quota Queue RCACHE Remote RPChat RPEmit RPTel Search \
                  See_All See_Queue SetQuotas Site SQL_Ok Summon Tel_Thing Tel_Place",
        auto: "Announce Attach BCreate Boot:2 Builder Can_NsPemit Cemit Chat Chown:2 Combat Cron \
               DAnnounce Division EAnnounce Economy Empire Empower:2 GFuncs Halt Hide Idle Join \
               Level:1 Link Login MailAdmin:1 Many_Attribs Modify:2 Newpass:1 NoPay NoQuota \
               Nuke:LT Open:2 Pass_Locks PCreate PEmit Poll PowerGroup:LTE Privilege PrivWho \
               Program ProgLock:1 Pueblo_Send Quota Queue RCACHE Remote RPChat RPEmit RPTel \
               Search:LTE See_All Search:lte See_Queue SetQuotas Site SQL_Ok Summon Tel_Thing \
               Tel_Place",
    },
    DefaultGroup {
        name: "Admin",
        ceiling: "Announce Attach BCreate Boot:1 Builder Can_NsPemit Cemit Chat Chown(LTE) Combat \
                  Cron DAnnounce Division EAnnounce Economy Empire Empower GFuncs Halt Hide Idle \
                  Join Level Link Login MailAdmin:2 Many_Attribs Modify Newpass:2 NoPay Nuke:LTE \
                  NoQuota Open:2 Pass_Locks:2 PCreate PEmit Poll Powergroup:lte Privilege PrivWho \
                  Program ProgLock:2 Pueblo_Send Quota Queue RCACHE Remote RPChat RPEmit RPTel \
                  Search:LTE See_All See_Queue SetQuotas SQL_Ok Summon Tel_Thing Tel_Place",
        auto: "Announce Attach:1 BCreate Builder Can_NsPemit Cemit Chat Combat Cron DAnnounce \
               Division EAnnounce Economy Empire Empower:2 GFuncs Halt:2 Hide Idle Join Level:1 \
               Link:2 Login Modify:2 Newpass:1 NoPay Nuke:LT NoQuota Open:2 PCreate PEmit Poll \
               PowerGroup:LTE Program Pueblo_Send Quota Queue RCACHE Remote RPChat RPEmit RPTel \
               Search:2 See_All:2 See_Queue Summon:1 Tel_Thing:1 Tel_Place:2",
    },
    DefaultGroup {
        name: "EmpireHead",
        ceiling: "Announce Attach:1 BCreate Boot:1 Builder Can_NsPemit Cemit Chat Combat Cron \
                  DAnnounce Division EAnnounce Economy Empower GFuncs Halt Hide Idle Join Level \
                  Link Login Many_Attribs Modify:2 Newpass:1 NoPay NoQuota Nuke:LT Open:2 \
                  Pass_Locks:2 PCreate PEmit Poll PowerGroup:LT Privilege PrivWho Program:2 \
                  Pueblo_Send Quota Queue RCACHE Remote RPChat RPEmit RPTel Search:2 See_All:2 \
                  See_Queue SetQuotas:LTE SQL_Ok Summon Tel_Thing:2 Tel_Place:1",
        auto: "Announce Attach:1 BCreate Boot:1 Builder Cemit Chat DAnnounce Division EAnnounce \
               Empower:1 Halt:1 Hide Idle Join:2 Level:1 Link:1 Login Modify:2 Newpass:1 NoPay \
               NoQuota Open:2 Pass_Locks PCreate PEmit:1 Poll PowerGroup:LT PrivWho Program:2 \
               Pueblo_Send Quota Queue Remote RPChat RPEmit Search:1 See_Queue SetQuotas:1 \
               Summon:1 Tel_Thing:1 Tel_Place:2",
    },
    DefaultGroup {
        name: "EmpireAdmin",
        ceiling: "",
        auto: "",
    },
    DefaultGroup {
        name: "Builder",
        ceiling: "Builder Cemit Chat Combat DAnnounce Division EAnnounce Economy Empower GFuncs \
                  Halt Hide Idle Join Level Link Login Many_Attribs Modify:2 NoPay NoQuota Open:2 \
                  PCreate PEmit Poll PrivWho Program:2 Pueblo_Send Quota Queue RCACHE Remote \
                  RPChat RPEmit RPTel Search:2 See_All:2 See_Queue Space Summon Tel_Thing:2 \
                  Tel_Place:2",
        auto: "Builder Hide Idle Join:2 Level:LT Login NoPay NoQuota Open:LTE PEmit:LT Poll \
               Program:LTE Pueblo_Send Quota Queue RPChat RPEmit See_Queue Tel_Thing:LT \
               Tel_Place:2",
    },
    DefaultGroup {
        name: "Player",
        ceiling: "Builder Chat Combat Hide Idle Login NoPay PEmit Poll RPChat RPEmit Summon Join",
        auto: "RPChat RPEmit",
    },
];
