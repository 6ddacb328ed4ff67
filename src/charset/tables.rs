//! Compile-time character tables for the two 8-bit charsets.
//!
//! Each table maps a byte value (the array index) to the Unicode code point
//! a terminal showing that byte would display. Slots with no natural
//! Unicode analogue use the private-use range U+F8F0..U+F8FF so that the
//! mapping stays injective (`decode` followed by `encode` always recovers
//! the original byte, see [`super::Charset::round_trip_check`]).
//!
//! Transcribed from the vintage character ROM layouts; halfwidth katakana
//! occupy 0xA1..0xDF as on real PC-98/PC-8801 hardware.

pub(crate) const PC98_TABLE: [char; 256] = [
    '\u{2400}', '\u{2401}', '\u{2402}', '\u{2403}', '\u{2404}', '\u{2405}', '\u{2406}', '\u{2407}',
    '\u{2408}', '\u{2409}', '\u{240a}', '\u{240b}', '\u{240c}', '\u{240d}', '\u{240e}', '\u{240f}',
    '\u{2410}', '\u{2411}', '\u{2412}', '\u{2413}', '\u{2414}', '\u{2415}', '\u{2416}', '\u{2417}',
    '\u{2418}', '\u{2419}', '\u{241a}', '\u{241b}', '\u{ffeb}', '\u{ffe9}', '\u{ffea}', '\u{ffec}',
    '\u{20}', '\u{21}', '\u{22}', '\u{23}', '\u{24}', '\u{25}', '\u{26}', '\u{27}', '\u{28}',
    '\u{29}', '\u{2a}', '\u{2b}', '\u{2c}', '\u{2d}', '\u{2e}', '\u{2f}', '\u{30}', '\u{31}',
    '\u{32}', '\u{33}', '\u{34}', '\u{35}', '\u{36}', '\u{37}', '\u{38}', '\u{39}', '\u{3a}',
    '\u{3b}', '\u{3c}', '\u{3d}', '\u{3e}', '\u{3f}', '\u{40}', '\u{41}', '\u{42}', '\u{43}',
    '\u{44}', '\u{45}', '\u{46}', '\u{47}', '\u{48}', '\u{49}', '\u{4a}', '\u{4b}', '\u{4c}',
    '\u{4d}', '\u{4e}', '\u{4f}', '\u{50}', '\u{51}', '\u{52}', '\u{53}', '\u{54}', '\u{55}',
    '\u{56}', '\u{57}', '\u{58}', '\u{59}', '\u{5a}', '\u{5b}', '\u{a5}', '\u{5d}', '\u{5e}',
    '\u{5f}', '\u{60}', '\u{61}', '\u{62}', '\u{63}', '\u{64}', '\u{65}', '\u{66}', '\u{67}',
    '\u{68}', '\u{69}', '\u{6a}', '\u{6b}', '\u{6c}', '\u{6d}', '\u{6e}', '\u{6f}', '\u{70}',
    '\u{71}', '\u{72}', '\u{73}', '\u{74}', '\u{75}', '\u{76}', '\u{77}', '\u{78}', '\u{79}',
    '\u{7a}', '\u{7b}', '\u{a6}', '\u{7d}', '\u{7e}', '\u{2421}', '\u{2581}', '\u{2582}', '\u{2583}',
    '\u{2584}', '\u{2585}', '\u{2586}', '\u{2587}', '\u{2588}', '\u{258f}', '\u{258e}', '\u{258d}',
    '\u{258c}', '\u{258b}', '\u{258a}', '\u{2589}', '\u{253c}', '\u{2534}', '\u{252c}', '\u{2524}',
    '\u{251c}', '\u{2594}', '\u{2500}', '\u{2502}', '\u{2595}', '\u{250c}', '\u{2510}', '\u{2514}',
    '\u{2518}', '\u{256d}', '\u{256e}', '\u{2570}', '\u{256f}', '\u{f8f0}', '\u{ff61}', '\u{ff62}',
    '\u{ff63}', '\u{ff64}', '\u{ff65}', '\u{ff66}', '\u{ff67}', '\u{ff68}', '\u{ff69}', '\u{ff6a}',
    '\u{ff6b}', '\u{ff6c}', '\u{ff6d}', '\u{ff6e}', '\u{ff6f}', '\u{ff70}', '\u{ff71}', '\u{ff72}',
    '\u{ff73}', '\u{ff74}', '\u{ff75}', '\u{ff76}', '\u{ff77}', '\u{ff78}', '\u{ff79}', '\u{ff7a}',
    '\u{ff7b}', '\u{ff7c}', '\u{ff7d}', '\u{ff7e}', '\u{ff7f}', '\u{ff80}', '\u{ff81}', '\u{ff82}',
    '\u{ff83}', '\u{ff84}', '\u{ff85}', '\u{ff86}', '\u{ff87}', '\u{ff88}', '\u{ff89}', '\u{ff8a}',
    '\u{ff8b}', '\u{ff8c}', '\u{ff8d}', '\u{ff8e}', '\u{ff8f}', '\u{ff90}', '\u{ff91}', '\u{ff92}',
    '\u{ff93}', '\u{ff94}', '\u{ff95}', '\u{ff96}', '\u{ff97}', '\u{ff98}', '\u{ff99}', '\u{ff9a}',
    '\u{ff9b}', '\u{ff9c}', '\u{ff9d}', '\u{ff9e}', '\u{ff9f}', '\u{2550}', '\u{255e}', '\u{256a}',
    '\u{2561}', '\u{25e2}', '\u{25e3}', '\u{25e5}', '\u{25e4}', '\u{2660}', '\u{2665}', '\u{2666}',
    '\u{2663}', '\u{2022}', '\u{ffee}', '\u{2571}', '\u{2572}', '\u{2573}', '\u{5186}', '\u{5e74}',
    '\u{6708}', '\u{65e5}', '\u{6642}', '\u{5206}', '\u{79d2}', '\u{f8f4}', '\u{f8f5}', '\u{f8f6}',
    '\u{f8f7}', '\u{5c}', '\u{f8f1}', '\u{f8f2}', '\u{f8f3}',
];

pub(crate) const PC6001_TABLE: [char; 256] = [
    '\u{2400}', '\u{2401}', '\u{2402}', '\u{2403}', '\u{2404}', '\u{2405}', '\u{2406}', '\u{2407}',
    '\u{2408}', '\u{2409}', '\u{240a}', '\u{240b}', '\u{240c}', '\u{240d}', '\u{240e}', '\u{240f}',
    '\u{2410}', '\u{2411}', '\u{2412}', '\u{2413}', '\u{2414}', '\u{2415}', '\u{2416}', '\u{2417}',
    '\u{2418}', '\u{2419}', '\u{241a}', '\u{241b}', '\u{ffeb}', '\u{ffe9}', '\u{ffea}', '\u{ffec}',
    '\u{20}', '\u{21}', '\u{22}', '\u{23}', '\u{24}', '\u{25}', '\u{26}', '\u{27}', '\u{28}',
    '\u{29}', '\u{2a}', '\u{2b}', '\u{2c}', '\u{2d}', '\u{2e}', '\u{2f}', '\u{30}', '\u{31}',
    '\u{32}', '\u{33}', '\u{34}', '\u{35}', '\u{36}', '\u{37}', '\u{38}', '\u{39}', '\u{3a}',
    '\u{3b}', '\u{3c}', '\u{3d}', '\u{3e}', '\u{3f}', '\u{40}', '\u{41}', '\u{42}', '\u{43}',
    '\u{44}', '\u{45}', '\u{46}', '\u{47}', '\u{48}', '\u{49}', '\u{4a}', '\u{4b}', '\u{4c}',
    '\u{4d}', '\u{4e}', '\u{4f}', '\u{50}', '\u{51}', '\u{52}', '\u{53}', '\u{54}', '\u{55}',
    '\u{56}', '\u{57}', '\u{58}', '\u{59}', '\u{5a}', '\u{5b}', '\u{a5}', '\u{5d}', '\u{5e}',
    '\u{5f}', '\u{60}', '\u{61}', '\u{62}', '\u{63}', '\u{64}', '\u{65}', '\u{66}', '\u{67}',
    '\u{68}', '\u{69}', '\u{6a}', '\u{6b}', '\u{6c}', '\u{6d}', '\u{6e}', '\u{6f}', '\u{70}',
    '\u{71}', '\u{72}', '\u{73}', '\u{74}', '\u{75}', '\u{76}', '\u{77}', '\u{78}', '\u{79}',
    '\u{7a}', '\u{7b}', '\u{a6}', '\u{7d}', '\u{7e}', '\u{2421}', '\u{2660}', '\u{2665}', '\u{2666}',
    '\u{2663}', '\u{ffee}', '\u{2022}', '\u{3092}', '\u{3041}', '\u{3043}', '\u{3045}', '\u{3047}',
    '\u{3049}', '\u{3083}', '\u{3085}', '\u{3087}', '\u{3063}', '\u{30fc}', '\u{3042}', '\u{3044}',
    '\u{3046}', '\u{3048}', '\u{304a}', '\u{304b}', '\u{304d}', '\u{304f}', '\u{3051}', '\u{3053}',
    '\u{3055}', '\u{3057}', '\u{3059}', '\u{305b}', '\u{305d}', '\u{f8f0}', '\u{ff61}', '\u{ff62}',
    '\u{ff63}', '\u{ff64}', '\u{ff65}', '\u{ff66}', '\u{ff67}', '\u{ff68}', '\u{ff69}', '\u{ff6a}',
    '\u{ff6b}', '\u{ff6c}', '\u{ff6d}', '\u{ff6e}', '\u{ff6f}', '\u{ff70}', '\u{ff71}', '\u{ff72}',
    '\u{ff73}', '\u{ff74}', '\u{ff75}', '\u{ff76}', '\u{ff77}', '\u{ff78}', '\u{ff79}', '\u{ff7a}',
    '\u{ff7b}', '\u{ff7c}', '\u{ff7d}', '\u{ff7e}', '\u{ff7f}', '\u{ff80}', '\u{ff81}', '\u{ff82}',
    '\u{ff83}', '\u{ff84}', '\u{ff85}', '\u{ff86}', '\u{ff87}', '\u{ff88}', '\u{ff89}', '\u{ff8a}',
    '\u{ff8b}', '\u{ff8c}', '\u{ff8d}', '\u{ff8e}', '\u{ff8f}', '\u{ff90}', '\u{ff91}', '\u{ff92}',
    '\u{ff93}', '\u{ff94}', '\u{ff95}', '\u{ff96}', '\u{ff97}', '\u{ff98}', '\u{ff99}', '\u{ff9a}',
    '\u{ff9b}', '\u{ff9c}', '\u{ff9d}', '\u{ff9e}', '\u{ff9f}', '\u{305f}', '\u{3061}', '\u{3064}',
    '\u{3066}', '\u{3068}', '\u{306a}', '\u{306b}', '\u{306c}', '\u{306d}', '\u{306e}', '\u{306f}',
    '\u{3072}', '\u{3075}', '\u{3078}', '\u{307b}', '\u{307e}', '\u{307f}', '\u{3080}', '\u{3081}',
    '\u{3082}', '\u{3084}', '\u{3086}', '\u{3088}', '\u{3089}', '\u{308a}', '\u{308b}', '\u{308c}',
    '\u{308d}', '\u{308f}', '\u{3093}', '\u{f8f2}', '\u{f8f3}',
];

/// Reached via a `0x14` prefix byte; index = second byte − 0x30.
pub(crate) const PC6001_ALT_TABLE: [char; 32] = [
    '\u{f8f1}', '\u{6708}', '\u{706b}', '\u{6c34}', '\u{6728}', '\u{91d1}', '\u{571f}', '\u{65e5}',
    '\u{5e74}', '\u{5186}', '\u{6642}', '\u{5206}', '\u{79d2}', '\u{767e}', '\u{5343}', '\u{4e07}',
    '\u{3c0}', '\u{2534}', '\u{252c}', '\u{2524}', '\u{251c}', '\u{253c}', '\u{2502}', '\u{2500}',
    '\u{250c}', '\u{2510}', '\u{2514}', '\u{2518}', '\u{2573}', '\u{5927}', '\u{4e2d}', '\u{5c0f}',
];

/// Compatibility-decomposition (NFKD) forms of the halfwidth-kana and arrow
/// glyphs in [`PC98_TABLE`], precomputed so `encode(..., strict=false)` can
/// fold fullwidth input down to the halfwidth byte without touching Unicode
/// normalization tables at runtime.
pub(crate) const PC98_COMPAT: [(&str, u8); 68] = [
    ("\u{2192}", 0x1c), ("\u{2190}", 0x1d), ("\u{2191}", 0x1e), ("\u{2193}", 0x1f),
    ("\u{3002}", 0xa1), ("\u{300c}", 0xa2), ("\u{300d}", 0xa3), ("\u{3001}", 0xa4),
    ("\u{30fb}", 0xa5), ("\u{30f2}", 0xa6), ("\u{30a1}", 0xa7), ("\u{30a3}", 0xa8),
    ("\u{30a5}", 0xa9), ("\u{30a7}", 0xaa), ("\u{30a9}", 0xab), ("\u{30e3}", 0xac),
    ("\u{30e5}", 0xad), ("\u{30e7}", 0xae), ("\u{30c3}", 0xaf), ("\u{30fc}", 0xb0),
    ("\u{30a2}", 0xb1), ("\u{30a4}", 0xb2), ("\u{30a6}", 0xb3), ("\u{30a8}", 0xb4),
    ("\u{30aa}", 0xb5), ("\u{30ab}", 0xb6), ("\u{30ad}", 0xb7), ("\u{30af}", 0xb8),
    ("\u{30b1}", 0xb9), ("\u{30b3}", 0xba), ("\u{30b5}", 0xbb), ("\u{30b7}", 0xbc),
    ("\u{30b9}", 0xbd), ("\u{30bb}", 0xbe), ("\u{30bd}", 0xbf), ("\u{30bf}", 0xc0),
    ("\u{30c1}", 0xc1), ("\u{30c4}", 0xc2), ("\u{30c6}", 0xc3), ("\u{30c8}", 0xc4),
    ("\u{30ca}", 0xc5), ("\u{30cb}", 0xc6), ("\u{30cc}", 0xc7), ("\u{30cd}", 0xc8),
    ("\u{30ce}", 0xc9), ("\u{30cf}", 0xca), ("\u{30d2}", 0xcb), ("\u{30d5}", 0xcc),
    ("\u{30d8}", 0xcd), ("\u{30db}", 0xce), ("\u{30de}", 0xcf), ("\u{30df}", 0xd0),
    ("\u{30e0}", 0xd1), ("\u{30e1}", 0xd2), ("\u{30e2}", 0xd3), ("\u{30e4}", 0xd4),
    ("\u{30e6}", 0xd5), ("\u{30e8}", 0xd6), ("\u{30e9}", 0xd7), ("\u{30ea}", 0xd8),
    ("\u{30eb}", 0xd9), ("\u{30ec}", 0xda), ("\u{30ed}", 0xdb), ("\u{30ef}", 0xdc),
    ("\u{30f3}", 0xdd), ("\u{3099}", 0xde), ("\u{309a}", 0xdf), ("\u{25cb}", 0xed),
];

/// Same idea as [`PC98_COMPAT`] but for [`PC6001_TABLE`] (no box-drawing
/// compatibility entries — those live only in the PC-98 table — but the
/// circle glyph sits at a different byte).
pub(crate) const PC6001_COMPAT: [(&str, u8); 68] = [
    ("\u{2192}", 0x1c), ("\u{2190}", 0x1d), ("\u{2191}", 0x1e), ("\u{2193}", 0x1f),
    ("\u{25cb}", 0x84),
    ("\u{3002}", 0xa1), ("\u{300c}", 0xa2), ("\u{300d}", 0xa3), ("\u{3001}", 0xa4),
    ("\u{30fb}", 0xa5), ("\u{30f2}", 0xa6), ("\u{30a1}", 0xa7), ("\u{30a3}", 0xa8),
    ("\u{30a5}", 0xa9), ("\u{30a7}", 0xaa), ("\u{30a9}", 0xab), ("\u{30e3}", 0xac),
    ("\u{30e5}", 0xad), ("\u{30e7}", 0xae), ("\u{30c3}", 0xaf), ("\u{30fc}", 0xb0),
    ("\u{30a2}", 0xb1), ("\u{30a4}", 0xb2), ("\u{30a6}", 0xb3), ("\u{30a8}", 0xb4),
    ("\u{30aa}", 0xb5), ("\u{30ab}", 0xb6), ("\u{30ad}", 0xb7), ("\u{30af}", 0xb8),
    ("\u{30b1}", 0xb9), ("\u{30b3}", 0xba), ("\u{30b5}", 0xbb), ("\u{30b7}", 0xbc),
    ("\u{30b9}", 0xbd), ("\u{30bb}", 0xbe), ("\u{30bd}", 0xbf), ("\u{30bf}", 0xc0),
    ("\u{30c1}", 0xc1), ("\u{30c4}", 0xc2), ("\u{30c6}", 0xc3), ("\u{30c8}", 0xc4),
    ("\u{30ca}", 0xc5), ("\u{30cb}", 0xc6), ("\u{30cc}", 0xc7), ("\u{30cd}", 0xc8),
    ("\u{30ce}", 0xc9), ("\u{30cf}", 0xca), ("\u{30d2}", 0xcb), ("\u{30d5}", 0xcc),
    ("\u{30d8}", 0xcd), ("\u{30db}", 0xce), ("\u{30de}", 0xcf), ("\u{30df}", 0xd0),
    ("\u{30e0}", 0xd1), ("\u{30e1}", 0xd2), ("\u{30e2}", 0xd3), ("\u{30e4}", 0xd4),
    ("\u{30e6}", 0xd5), ("\u{30e8}", 0xd6), ("\u{30e9}", 0xd7), ("\u{30ea}", 0xd8),
    ("\u{30eb}", 0xd9), ("\u{30ec}", 0xda), ("\u{30ed}", 0xdb), ("\u{30ef}", 0xdc),
    ("\u{30f3}", 0xdd), ("\u{3099}", 0xde), ("\u{309a}", 0xdf),
];
