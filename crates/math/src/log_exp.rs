//! # Natural Logarithm and Exponential
//!
//! Signed 18-decimal `ln` and `exp` using rational approximations evaluated in
//! a 2^96 binary basis. These are bit-for-bit the functions the settlement
//! engine uses, so every fixed-point power in the crate agrees with it exactly.

use ethnum::{I256, U256};
use strata_types::{StrataError, StrataResult, EXP_MAX_ARGUMENT, EXP_MIN_ARGUMENT};

use crate::safe::{i256_to_u256, safe_mul_u256, u256_to_i256};

/// 5^18, the odd part of 10^18
const FIVE_POW_18: i128 = 3_814_697_265_625;

/// ln(2) in 2^96 fixed point
const LN2_X96: i128 = 54_916_777_467_707_473_351_141_471_128;

/// Scale factor s · 1e18 / 2^96 for the exp result, in 2^213 basis
/// (3822833074963236453042738258902158003155416615667)
const EXP_SCALE: U256 = U256::from_words(0x29d9dc385, 0x63c32e5c_2f6dc192_ee70ef65_f9978af3);

/// ln scale factor s · 5e18 · 2^96
/// (1677202110996718588342820967067443963516166)
const LN_SCALE: I256 = I256::from_words(0x1340, 0xdaa0d5f7_69dba191_5cef59f0_815a5506_u128 as i128);

/// ln(2) · 5e18 · 2^192
/// (16597577552685614221487285958193947469193820559219878177908093499208371)
const LN_LN2: I256 = I256::from_words(
    0x267a36c0c95b3975ab3ee5b203a,
    0x7614a3f7_5373f047_d803ae7b_6687f2b3,
);

/// ln(2^96 / 1e18) · 5e18 · 2^192
/// (600920179829731861736702779321621459595472258049074101567377883020018308)
const LN_BASE_OFFSET: I256 = I256::from_words(
    0x57115e47018c7177eebf7cd370a3,
    0x356a1b78_63008a5a_e8028c72_b8864284,
);

/// Natural logarithm of a signed 18-decimal fixed-point value
///
/// # Errors
/// `Domain` if `x <= 0`.
pub fn ln(x: I256) -> StrataResult<I256> {
    if x <= I256::ZERO {
        return Err(StrataError::domain("ln", &x));
    }
    let unsigned = i256_to_u256(x, "ln")?;

    // Reduce range of x to [1, 2) * 2^96 using ln(2^k * x) = k * ln(2) + ln(x).
    // The conversion from 1e18 to 2^96 basis is folded into the final offset.
    let log2 = 255 - unsigned.leading_zeros() as i32;
    let k = log2 - 96;
    let reduced = (unsigned << (159 - k) as u32) >> 159u32;
    let x = u256_to_i256(reduced, "ln")?;

    // (8, 8)-term rational approximation; p is monic and left in 2^192 basis.
    let mut p = x + I256::new(3_273_285_459_638_523_848_632_254_066_296);
    p = ((p * x) >> 96u32) + I256::new(24_828_157_081_833_163_892_658_089_445_524);
    p = ((p * x) >> 96u32) + I256::new(43_456_485_725_739_037_958_740_375_743_393);
    p = ((p * x) >> 96u32) - I256::new(11_111_509_109_440_967_052_023_855_526_967);
    p = ((p * x) >> 96u32) - I256::new(45_023_709_667_254_063_763_336_534_515_857);
    p = ((p * x) >> 96u32) - I256::new(14_706_773_417_378_608_786_704_636_184_526);
    p = p * x - (I256::new(795_164_235_651_350_426_258_249_787_498) << 96u32);

    let mut q = x + I256::new(5_573_035_233_440_673_466_300_451_813_936);
    q = ((q * x) >> 96u32) + I256::new(71_694_874_799_317_883_764_090_561_454_958);
    q = ((q * x) >> 96u32) + I256::new(283_447_036_172_924_575_727_196_451_306_956);
    q = ((q * x) >> 96u32) + I256::new(401_686_690_394_027_663_651_624_208_769_553);
    q = ((q * x) >> 96u32) + I256::new(204_048_457_590_392_012_362_485_061_816_622);
    q = ((q * x) >> 96u32) + I256::new(31_853_899_698_501_571_402_653_359_427_138);
    q = ((q * x) >> 96u32) + I256::new(909_429_971_244_387_300_277_376_558_375);

    // q has no roots in the reduced domain
    let mut r = p / q;

    // r is in (0, 0.125) * 2^96. Scale, add k * ln(2) and the basis offset,
    // then convert from 5^18 * 2^192 back to 1e18.
    r *= LN_SCALE;
    r += LN_LN2 * I256::new(k as i128);
    r += LN_BASE_OFFSET;
    Ok(r >> 174u32)
}

/// e^x for a signed 18-decimal fixed-point value
///
/// Returns zero when the result is below 0.5e-18.
///
/// # Errors
/// `Domain` if the result would not fit a signed 256-bit integer.
pub fn exp(x: I256) -> StrataResult<I256> {
    if x <= I256::new(EXP_MIN_ARGUMENT) {
        return Ok(I256::ZERO);
    }
    if x >= I256::new(EXP_MAX_ARGUMENT) {
        return Err(StrataError::domain("exp", &x));
    }

    // Convert from 1e18 to 2^96 basis: multiply by 2^96 / 1e18 = 2^78 / 5^18.
    let x = (x << 78u32) / I256::new(FIVE_POW_18);

    // Factor out powers of two: exp(x) = exp(x') * 2^k, k = round(x / ln 2).
    let ln2 = I256::new(LN2_X96);
    let k = ((x << 96u32) / ln2 + (I256::ONE << 95u32)) >> 96u32;
    let x = x - k * ln2;

    // (6, 7)-term rational approximation; p is monic and left in 2^192 basis.
    let mut y = x + I256::new(1_346_386_616_545_796_478_920_950_773_328);
    y = ((y * x) >> 96u32) + I256::new(57_155_421_227_552_351_082_224_309_758_442);
    let mut p = y + x - I256::new(94_201_549_194_550_492_254_356_042_504_812);
    p = ((p * y) >> 96u32) + I256::new(28_719_021_644_029_726_153_956_944_680_412_240);
    p = p * x + (I256::new(4_385_272_521_454_847_904_659_076_985_693_276) << 96u32);

    let mut q = x - I256::new(2_855_989_394_907_223_263_936_484_059_900);
    q = ((q * x) >> 96u32) + I256::new(50_020_603_652_535_783_019_961_831_881_945);
    q = ((q * x) >> 96u32) - I256::new(533_845_033_583_426_703_283_633_433_725_380);
    q = ((q * x) >> 96u32) + I256::new(3_604_857_256_930_695_427_073_651_918_091_429);
    q = ((q * x) >> 96u32) - I256::new(14_423_608_567_350_463_180_887_372_962_807_573);
    q = ((q * x) >> 96u32) + I256::new(26_449_188_498_355_588_339_934_803_723_976_023);

    // q has only complex roots, r is in (0.09, 0.25) * 2^96
    let r = i256_to_u256(p / q, "exp")?;

    // Multiply by the scale factor, 2^k and 1e18 / 2^96 in one step, with an
    // intermediate 2^213 basis so the final shift is never negative.
    let (_, k_lo) = k.into_words();
    let shift = 195 - k_lo as i32;
    let scaled = safe_mul_u256(r, EXP_SCALE)?;
    let result = if shift >= 256 { U256::ZERO } else { scaled >> shift as u32 };
    u256_to_i256(result, "exp")
}
